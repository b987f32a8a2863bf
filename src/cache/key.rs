// Cache key derivation.
// Keys are the endpoint name followed by the request parameters as stable JSON.

use serde::Serialize;

/// Build the cache key for a request.
///
/// Parameters are serialized through `serde_json::Value`, whose maps are
/// ordered, so object keys always come out sorted.
pub fn cache_key<P>(endpoint: &str, params: Option<&P>) -> serde_json::Result<String>
where
    P: Serialize + ?Sized,
{
    match params {
        Some(params) => {
            let value = serde_json::to_value(params)?;
            Ok(format!("{}{}", endpoint, value))
        }
        None => Ok(endpoint.to_string()),
    }
}
