use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GenerateCourseRequest {
    pub topic: String,
}
