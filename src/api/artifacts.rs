//
//  bamboo-cli
//  api/artifacts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared build artifacts.
//!
//! Artifacts shared by a build are served outside the REST API, at
//! `/browse/{build}/artifact/shared/{name}/{name}`. They can be read whole
//! with [`BambooClient::artifact_content`] or chunk by chunk with
//! [`BambooClient::artifact_stream`].

use futures::stream::{self, Stream};
use reqwest::Response;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::client::BambooClient;
use super::common::{ApiError, QueryParams};

fn artifact_path(build: &str, name: &str) -> String {
    format!("/browse/{}/artifact/shared/{}/{}", build, name, name)
}

/// A streamed artifact body.
///
/// The response status has already been checked when this value exists, so
/// every error it yields is a transport or sink failure.
#[derive(Debug)]
pub struct ArtifactStream {
    response: Response,
}

impl ArtifactStream {
    /// Size announced by the server, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Returns the next chunk, or `None` at the end of the body.
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, ApiError> {
        Ok(self.response.chunk().await?.map(|chunk| chunk.to_vec()))
    }

    /// Converts into a [`Stream`] of chunks.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<u8>, ApiError>> {
        stream::try_unfold(self, |mut artifact| async move {
            Ok(artifact.next_chunk().await?.map(|chunk| (chunk, artifact)))
        })
    }

    /// Copies the remaining body into `sink` and returns the number of bytes
    /// written.
    ///
    /// `on_chunk` is called with the size of every chunk, e.g. to drive a
    /// progress bar.
    pub async fn copy_to<W>(
        mut self,
        sink: &mut W,
        mut on_chunk: impl FnMut(usize),
    ) -> Result<u64, ApiError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0u64;
        while let Some(chunk) = self.next_chunk().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
            on_chunk(chunk.len());
        }
        sink.flush().await?;
        Ok(written)
    }
}

impl BambooClient {
    /// Downloads a shared artifact and returns its body unchanged.
    ///
    /// The whole body is buffered; use [`artifact_stream`](Self::artifact_stream)
    /// for large artifacts.
    pub async fn artifact_content(&self, build: &str, name: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .get_response(&artifact_path(build, name), &QueryParams::new())
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Opens a shared artifact for streaming.
    ///
    /// The status is checked before the first chunk is read, so a missing
    /// artifact is reported here rather than mid-stream.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bamboo_cli::api::BambooClient;
    ///
    /// # async fn run() -> Result<(), bamboo_cli::api::ApiError> {
    /// let client = BambooClient::new(None, None, None)?;
    /// let artifact = client.artifact_stream("PROJ-PLAN-12", "report").await?;
    /// let mut file = tokio::fs::File::create("report.html").await?;
    /// let bytes = artifact.copy_to(&mut file, |_| {}).await?;
    /// println!("{} bytes", bytes);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn artifact_stream(&self, build: &str, name: &str) -> Result<ArtifactStream, ApiError> {
        let response = self
            .get_response(&artifact_path(build, name), &QueryParams::new())
            .await?;
        Ok(ArtifactStream { response })
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use mockito::Server;

    use super::*;

    const REPORT: &str = "/browse/AA-BB-3/artifact/shared/report/report";

    fn client(server: &Server) -> BambooClient {
        BambooClient::new(Some(&server.url()), None, None).unwrap()
    }

    #[tokio::test]
    async fn test_artifact_content() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", REPORT)
            .with_body("all tests passed\n")
            .create_async()
            .await;

        let content = client(&server)
            .artifact_content("AA-BB-3", "report")
            .await
            .unwrap();
        assert_eq!(content, b"all tests passed\n");
    }

    #[tokio::test]
    async fn test_artifact_content_keeps_binary_bytes() {
        let mut server = Server::new_async().await;
        let body: Vec<u8> = vec![0x1f, 0x8b, 0x08, 0x00, 0xff, 0xfe, 0x80];
        server
            .mock("GET", REPORT)
            .with_body(&body)
            .create_async()
            .await;

        let content = client(&server)
            .artifact_content("AA-BB-3", "report")
            .await
            .unwrap();
        assert_eq!(content, body);
    }

    #[tokio::test]
    async fn test_artifact_stream_copies_body() {
        let mut server = Server::new_async().await;
        let body = "x".repeat(64 * 1024);
        server
            .mock("GET", REPORT)
            .with_body(&body)
            .create_async()
            .await;

        let artifact = client(&server)
            .artifact_stream("AA-BB-3", "report")
            .await
            .unwrap();
        let mut sink: Vec<u8> = Vec::new();
        let mut seen = 0usize;
        let written = artifact.copy_to(&mut sink, |n| seen += n).await.unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(seen, body.len());
        assert_eq!(sink, body.as_bytes());
    }

    #[tokio::test]
    async fn test_artifact_stream_as_stream() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", REPORT)
            .with_body("abc")
            .create_async()
            .await;

        let chunks: Vec<Vec<u8>> = client(&server)
            .artifact_stream("AA-BB-3", "report")
            .await
            .unwrap()
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(chunks.concat(), b"abc");
    }

    #[tokio::test]
    async fn test_missing_artifact_fails_before_streaming() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", REPORT)
            .with_status(404)
            .with_body("<html>not found</html>")
            .create_async()
            .await;

        let err = client(&server)
            .artifact_stream("AA-BB-3", "report")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
