use crate::ResponseBody;
use bytes::{Bytes, BytesMut};
use http_body_util::BodyExt;
use httprpc::BoxError;
use std::time::Duration;

/// Buffers a whole response body. With an inactivity timeout, each frame must
/// arrive within that duration of the previous one.
pub async fn buffer_response_body(
    mut body: ResponseBody,
    inactivity_timeout: Option<Duration>,
) -> Result<Bytes, BoxError> {
    let mut buffer = BytesMut::new();

    loop {
        let next = match inactivity_timeout {
            Some(timeout) => tokio::time::timeout(timeout, body.frame()).await?,
            None => body.frame().await,
        };

        let Some(frame) = next else {
            break;
        };

        if let Ok(data) = frame?.into_data() {
            buffer.extend_from_slice(&data);
        }
    }

    Ok(buffer.freeze())
}
