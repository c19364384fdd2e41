use doctor_library::management::management::Management;
use std::process::ExitCode;

#[actix_web::main]
async fn main() -> ExitCode {
    let exit_code = Management::run().await;
    Management::terminate().await;
    exit_code
}
