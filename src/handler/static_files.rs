//! Static file serving module
//!
//! Maps request paths to files under the configured site root, with lexical
//! path normalization so a request can never read outside the root.

use crate::config::SiteConfig;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub async fn serve(method: &Method, path: &str, site: &SiteConfig) -> Response<Full<Bytes>> {
    let is_head = *method == Method::HEAD;
    if !is_head && *method != Method::GET {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return http::build_405_response();
    }

    let file_path = match resolve(Path::new(&site.root), path, &site.index) {
        Resolution::File(p) => p,
        Resolution::Escapes => {
            logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
            return http::build_403_response();
        }
    };

    match fs::read(&file_path).await {
        Ok(content) => {
            let content_type =
                mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
            http::build_static_file_response(content, content_type, is_head)
        }
        // Missing files are routine, not worth a warning
        Err(_) => http::build_404_response(),
    }
}

enum Resolution {
    File(PathBuf),
    Escapes,
}

/// Lexically resolve a request path under the site root. `/` and any path
/// ending in `/` pick up the index document. A `..` that climbs past the root
/// is an escape.
fn resolve(root: &Path, request_path: &str, index: &str) -> Resolution {
    let rel = if request_path.ends_with('/') {
        format!("{request_path}{index}")
    } else {
        request_path.to_string()
    };

    let mut normalized = PathBuf::new();
    let mut depth = 0_usize;
    for component in Path::new(rel.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => {
                normalized.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return Resolution::Escapes;
                }
                normalized.pop();
                depth -= 1;
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Resolution::Escapes,
        }
    }

    Resolution::File(root.join(normalized))
}
