//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s4-core.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::types::{CommonPrefix, Object};

use s4_core::{Entry, Error, ObjectStore, RemotePath, Result, S3Config};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from `.s3cfg` connection settings
    pub async fn new(config: &S3Config) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let credentials = aws_credential_types::Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None, // session token
            None, // expiry
            "s4-static-credentials",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style())
            .build();

        tracing::debug!(
            endpoint = %endpoint,
            region = %config.region,
            path_style = config.path_style(),
            "created S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Page through ListObjectsV2 until the listing is exhausted
    async fn list_all(&self, dir: &RemotePath, delimited: bool) -> Result<Vec<Entry>> {
        let prefix = dir.listing_prefix();
        let mut entries = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .inner
                .list_objects_v2()
                .bucket(&dir.bucket)
                .prefix(&prefix);

            if delimited {
                request = request.delimiter("/");
            }

            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| map_sdk_error(e, &dir.to_string()))?;

            entries.extend(entries_from_page(
                response.common_prefixes(),
                response.contents(),
            ));

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(entries)
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_entries(&self, dir: &RemotePath) -> Result<Vec<Entry>> {
        self.list_all(dir, true).await
    }

    async fn list_descendants(&self, dir: &RemotePath) -> Result<Vec<Entry>> {
        self.list_all(dir, false).await
    }

    async fn get_object(&self, path: &RemotePath) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &path.to_string()))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(
        &self,
        path: &RemotePath,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut request = self
            .inner
            .put_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &path.to_string()))?;

        Ok(())
    }

    async fn delete_object(&self, path: &RemotePath) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &path.to_string()))?;

        Ok(())
    }

    async fn copy_object(&self, src: &RemotePath, dst: &RemotePath) -> Result<()> {
        // Build copy source: bucket/key
        let copy_source = format!("{}/{}", src.bucket, src.key);

        self.inner
            .copy_object()
            .copy_source(&copy_source)
            .bucket(&dst.bucket)
            .key(&dst.key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &src.to_string()))?;

        Ok(())
    }

    async fn bucket_accessible(&self, bucket: &str) -> Result<()> {
        self.inner
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("bucket '{bucket}'")))?;

        Ok(())
    }
}

/// Convert one ListObjectsV2 page into entries
///
/// Directory markers (keys ending in `/`) and empty prefixes are dropped.
fn entries_from_page(prefixes: &[CommonPrefix], objects: &[Object]) -> Vec<Entry> {
    let dirs = prefixes
        .iter()
        .filter_map(|p| p.prefix())
        .filter(|p| !p.trim_end_matches('/').is_empty())
        .map(Entry::dir);

    let files = objects.iter().filter_map(|object| {
        let key = object.key()?;
        if key.is_empty() || key.ends_with('/') {
            return None;
        }

        let size = u64::try_from(object.size().unwrap_or(0)).unwrap_or(0);
        let mut entry = Entry::file(key, size);
        if let Some(modified) = object.last_modified() {
            entry.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
        }
        Some(entry)
    });

    dirs.chain(files).collect()
}

fn map_sdk_error<E>(err: SdkError<E>, target: &str) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    classify(status, &DisplayErrorContext(&err).to_string(), target)
}

/// Map an HTTP status and error text onto the core error kinds
fn classify(status: Option<u16>, message: &str, target: &str) -> Error {
    const NOT_FOUND: [&str; 3] = ["NotFound", "NoSuchKey", "NoSuchBucket"];
    const DENIED: [&str; 4] = [
        "AccessDenied",
        "Forbidden",
        "InvalidAccessKeyId",
        "SignatureDoesNotMatch",
    ];
    const CONFLICT: [&str; 3] = ["PreconditionFailed", "OperationAborted", "BucketNotEmpty"];

    if status == Some(404) || NOT_FOUND.iter().any(|m| message.contains(m)) {
        Error::NotFound(target.to_string())
    } else if matches!(status, Some(401 | 403)) || DENIED.iter().any(|m| message.contains(m)) {
        Error::Auth(format!("{target}: {message}"))
    } else if matches!(status, Some(409 | 412)) || CONFLICT.iter().any(|m| message.contains(m)) {
        Error::Conflict(format!("{target}: {message}"))
    } else if matches!(status, Some(400..=499)) {
        Error::General(format!("{target}: {message}"))
    } else {
        Error::Network(message.to_string())
    }
}
