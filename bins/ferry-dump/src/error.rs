use ferry_api::ConvertError;

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("output: {0}")]
    Output(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
