use crate::form::Credentials;
use crate::memory::MemorySize;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::ConfigLoader;
use aws_sdk_lambda::config::retry::RetryConfig;
use aws_sdk_lambda::config::{Credentials as StaticCredentials, Region};
use aws_sdk_lambda::error::DisplayErrorContext;
use tracing::warn;

/// The two function-management calls a measurement needs.
#[async_trait]
pub trait FunctionApi: Send + Sync + 'static {
    async fn update_memory(&self, function: &str, memory: MemorySize) -> Result<()>;

    async fn invoke(&self, function: &str) -> Result<()>;
}

/// Builds a Lambda client from the credentials and region typed into the form.
pub async fn client(credentials: &Credentials, region: &str) -> aws_sdk_lambda::Client {
    let aws_config = loader(credentials, region).load().await;

    aws_sdk_lambda::Client::new(&aws_config)
}

/// Calls are attempted once, so no backoff ever lands inside a timed invoke.
fn loader(credentials: &Credentials, region: &str) -> ConfigLoader {
    let credentials = StaticCredentials::new(
        credentials.access_key(),
        credentials.secret_key(),
        None,
        None,
        "right-sizing-form",
    );

    aws_config::from_env()
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
}

pub async fn update_memory(
    lambda: &aws_sdk_lambda::Client,
    function: &str,
    memory: MemorySize,
) -> Result<()> {
    lambda
        .update_function_configuration()
        .function_name(function)
        .memory_size(i32::from(memory.mb()))
        .send()
        .await
        .map_err(|err| anyhow!("update function configuration: {}", DisplayErrorContext(&err)))?;

    Ok(())
}

pub async fn invoke(lambda: &aws_sdk_lambda::Client, function: &str) -> Result<()> {
    let response = lambda
        .invoke()
        .function_name(function)
        .send()
        .await
        .map_err(|err| anyhow!("invoke function: {}", DisplayErrorContext(&err)))?;

    // The timing still counts, the handler ran to completion.
    if let Some(function_error) = response.function_error() {
        warn!("{} returned a function error: {}", function, function_error);
    }

    Ok(())
}

#[async_trait]
impl FunctionApi for aws_sdk_lambda::Client {
    async fn update_memory(&self, function: &str, memory: MemorySize) -> Result<()> {
        update_memory(self, function, memory).await
    }

    async fn invoke(&self, function: &str) -> Result<()> {
        invoke(self, function).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Form;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers every request with a throttling error and counts them.
    async fn throttling_endpoint() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);

                let mut request = vec![0u8; 64 * 1024];
                let _ = socket.read(&mut request).await;

                let body = r#"{"message":"Rate exceeded","Type":"User"}"#;
                let response = format!(
                    "HTTP/1.1 429 Too Many Requests\r\n\
                     x-amzn-errortype: TooManyRequestsException\r\n\
                     content-type: application/json\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (endpoint, requests)
    }

    async fn local_client(endpoint: &str) -> aws_sdk_lambda::Client {
        let form = Form {
            function: "thumbnailer".to_string(),
            access_key: "AKIAEXAMPLE".to_string(),
            secret_key: "wJalrXUtnFEMI".to_string(),
            region: "us-east-1".to_string(),
            ..Default::default()
        };
        let request = form.validate().unwrap();

        let aws_config = loader(request.credentials(), request.region())
            .endpoint_url(endpoint)
            .load()
            .await;

        aws_sdk_lambda::Client::new(&aws_config)
    }

    #[tokio::test]
    async fn throttled_update_is_sent_once() {
        let (endpoint, requests) = throttling_endpoint().await;
        let lambda = local_client(&endpoint).await;
        let memory = MemorySize::try_from(512).unwrap();

        let result = update_memory(&lambda, "thumbnailer", memory).await;

        assert!(result.is_err());
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn throttled_invoke_is_sent_once() {
        let (endpoint, requests) = throttling_endpoint().await;
        let lambda = local_client(&endpoint).await;

        let err = invoke(&lambda, "thumbnailer").await.unwrap_err();

        assert!(err.to_string().starts_with("invoke function:"));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }
}
