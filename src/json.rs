#[derive(serde::Deserialize, Debug, Default)]
pub struct YoutubeRequest {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

impl YoutubeRequest {
    /// Never fails: anything that isn't `{"videoId": "..."}` just ends up without an ID
    pub fn parse_lenient(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

#[derive(serde::Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}
