use crate::detection::detector::Detector;
use crate::detection::onnx_detector::OnnxDetector;
use crate::diagnosis::orchestrator::Orchestrator;
use crate::fetcher::build_client;
use crate::fetcher::search::{GoogleSearchFetcher, SearchFetcher};
use crate::fetcher::summary::{SummaryFetcher, WikipediaFetcher};
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::api::{config, default, diagnosis, log};
use actix_cors::Cors;
use actix_web::web::{self, route};
use actix_web::{App, HttpServer};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub struct Management;

impl Management {
    /// Loads every dependency the service needs, then serves until the web server stops.
    pub async fn run() -> ExitCode {
        logging_information!(SystemEntry::Initializing);
        let config = match Config::load() {
            Ok(config) => Arc::new(config),
            Err(err) => {
                logging_emergency!(SystemEntry::InvalidConfig(err.to_string()));
                return ExitCode::FAILURE;
            },
        };
        logging_information!(SystemEntry::ConfigLoaded);
        let detector = match OnnxDetector::load(&config) {
            Ok(detector) => detector,
            Err(err) => {
                logging_emergency!(SystemEntry::ModelLoadError(err.to_string()));
                return ExitCode::FAILURE;
            },
        };
        logging_information!(SystemEntry::ModelReady(config.model_path.display().to_string(), detector.labels().len()));
        let client = match build_client(&config) {
            Ok(client) => client,
            Err(err) => {
                logging_emergency!(SystemEntry::HttpClientError(err.to_string()));
                return ExitCode::FAILURE;
            },
        };
        let summary_fetcher = WikipediaFetcher::new(client.clone(), &config);
        let search_fetcher = GoogleSearchFetcher::new(client, &config);
        let orchestrator = Orchestrator::new(Arc::clone(&config), detector, summary_fetcher, search_fetcher);
        Self::serve(config, orchestrator).await
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        logging_information!(SystemEntry::TerminateComplete);
    }

    async fn serve<D: Detector, S: SummaryFetcher, W: SearchFetcher>(config: Arc<Config>, orchestrator: Orchestrator<D, S, W>) -> ExitCode {
        let config_data = web::Data::from(Arc::clone(&config));
        let orchestrator = web::Data::new(orchestrator);
        let http_server = loop {
            let config_data = config_data.clone();
            let orchestrator = orchestrator.clone();
            let http_server = HttpServer::new(move || {
                let cors = Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .app_data(config_data.clone())
                    .app_data(orchestrator.clone())
                    .service(config::initialize())
                    .service(diagnosis::initialize::<D, S, W>())
                    .service(log::initialize())
                    .default_service(route().to(default::default_route))
            })
            .bind(format!("0.0.0.0:{}", config.http_server_bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(NetworkEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                },
            }
        };
        logging_information!(SystemEntry::WebReady(config.http_server_bind_port));
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        match http_server.run().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                logging_emergency!(SystemEntry::WebPanic(err));
                ExitCode::FAILURE
            },
        }
    }
}
