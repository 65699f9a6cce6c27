use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::errors::DashboardError;

/// GET a JSON document and deserialize it, attributing decode failures
/// to the owning source by name. Transport failures keep their network
/// classification so the live tier can retry them.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    source: &str,
) -> Result<T, DashboardError> {
    let response = client.get(url).send().await?.error_for_status()?;
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            DashboardError::MalformedPayload {
                source_name: source.to_string(),
                message: e.to_string(),
            }
        } else {
            DashboardError::from(e)
        }
    })
}
