//! Static assets contributed by template providers.

use crate::host::{StaticFile, TemplateProvider};
use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;

/// The content type of a static asset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MimeType {
    /// Plain text.
    Text,
    /// HTML.
    Html,
    /// A stylesheet.
    Css,
    /// A script.
    Js,
    /// A PNG image.
    Png,
    /// An SVG image.
    Svg,
    /// Anything else.
    OctetStream,
}

impl MimeType {
    /// Guesses the content type of a file from its name.
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once('.').map(|(_, ext)| ext) {
            Some("txt") => Self::Text,
            Some("html") => Self::Html,
            Some("css") => Self::Css,
            Some("js") => Self::Js,
            Some("png") => Self::Png,
            Some("svg") => Self::Svg,
            _ => Self::OctetStream,
        }
    }

    /// The `Content-Type` header value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Css => "text/css",
            Self::Js => "application/javascript",
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl core::fmt::Display for MimeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered static asset.
#[derive(Clone, Copy, Debug)]
pub struct ResourceFile {
    /// The content type.
    mime_type: MimeType,
    /// The file contents.
    data: &'static [u8],
}

impl ResourceFile {
    /// The content type.
    pub fn mime_type(&self) -> MimeType {
        self.mime_type
    }

    /// The file contents.
    pub fn as_bytes(&self) -> &'static [u8] {
        self.data
    }
}

impl IntoResponse for ResourceFile {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.mime_type.as_str()),
                (header::CACHE_CONTROL, "max-age=604800, public"),
            ],
            self.data,
        )
            .into_response()
    }
}

/// The static assets served under the host's chrome path.
#[derive(Debug, Default)]
pub struct ResourceManager {
    /// Assets keyed by `{prefix}/{path}`.
    resource_files: HashMap<String, ResourceFile>,
}

impl ResourceManager {
    /// Creates an empty asset registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every file of every directory of a provider. A file with the
    /// same path as an already registered file replaces it.
    pub fn register_provider(&mut self, provider: &dyn TemplateProvider) {
        for (prefix, files) in provider.htdocs_dirs() {
            for file in files {
                self.register_resource(&format!("{prefix}/{}", file.path), file);
            }
        }
    }

    /// Registers a single file under the given path.
    pub fn register_resource(&mut self, name: &str, file: &StaticFile) {
        log::debug!("Registered static asset {name}");
        self.resource_files.insert(
            name.to_string(),
            ResourceFile {
                mime_type: MimeType::from_path(file.path),
                data: file.data,
            },
        );
    }

    /// Finds a registered asset by path.
    pub fn find_resource(&self, name: &str) -> Option<ResourceFile> {
        self.resource_files.get(name).copied()
    }

    /// The number of registered assets.
    pub fn len(&self) -> usize {
        self.resource_files.len()
    }

    /// Returns true if no assets are registered.
    pub fn is_empty(&self) -> bool {
        self.resource_files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WikiStatusList, status_list::STYLESHEET};

    #[test]
    fn mime_types() {
        assert_eq!(MimeType::from_path("style.css"), MimeType::Css);
        assert_eq!(MimeType::from_path("a.b/icon.png"), MimeType::Png);
        assert_eq!(MimeType::from_path("README"), MimeType::OctetStream);
        assert_eq!(MimeType::Css.to_string(), "text/css");
    }

    #[test]
    fn registers_provider_files() {
        let mut resources = ResourceManager::new();
        assert!(resources.is_empty());
        resources.register_provider(&WikiStatusList);
        assert_eq!(resources.len(), 1);

        let file = resources.find_resource(STYLESHEET).unwrap();
        assert_eq!(file.mime_type(), MimeType::Css);
        assert!(!file.as_bytes().is_empty());
        assert!(resources.find_resource("style.css").is_none());
    }

    #[test]
    fn response_headers() {
        let mut resources = ResourceManager::new();
        resources.register_provider(&WikiStatusList);
        let response = resources.find_resource(STYLESHEET).unwrap().into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }
}
