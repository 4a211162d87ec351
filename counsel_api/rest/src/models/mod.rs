use serde::Serialize;

pub mod contact;
pub mod news;

#[derive(Serialize)]
pub struct ApiError<D> {
    pub detail: D,
}
