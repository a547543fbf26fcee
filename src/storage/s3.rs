use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;

use super::ObjectStore;

/// An [`ObjectStore`] over the keys of an S3 bucket sharing a common prefix.
///
/// Object names are the keys with `prefix` stripped, so `test-logs/total.log`
/// is addressed as `total.log` when the prefix is `test-logs/`.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: &str, prefix: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// Creates a store using the ambient AWS configuration (env vars, instance
    /// profile, etc.).
    pub async fn from_env(bucket: &str, prefix: &str) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket, prefix)
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&self.prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .with_context(|| format!("S3 ListObjectsV2 failed for bucket '{}'", self.bucket))?;

            for object in resp.contents() {
                if let Some(name) = object.key().and_then(|k| k.strip_prefix(&self.prefix)) {
                    names.push(name.to_string());
                }
            }

            match resp.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let key = self.key(name);
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("S3 GetObject failed for '{key}'"));
            }
        };

        let body = resp
            .body
            .collect()
            .await
            .with_context(|| format!("failed to download '{key}'"))?;

        Ok(Some(body.into_bytes().to_vec()))
    }

    async fn write_text(&self, name: &str, text: &str) -> Result<()> {
        let key = self.key(name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(text.as_bytes().to_vec()))
            .content_type("text/plain; charset=utf-8")
            .send()
            .await
            .with_context(|| format!("S3 PutObject failed for '{key}'"))?;

        Ok(())
    }
}
