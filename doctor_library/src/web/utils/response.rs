use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct OperationStatus<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

impl<T: Serialize> OperationStatus<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// A failed operation that still reports data, such as the id its log was written under.
    pub fn rejection<S: Into<String>>(message: S, data: T) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}
