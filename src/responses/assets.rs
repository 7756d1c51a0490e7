// responses/assets.rs
//
// Static files and image assets. Paths are resolved against a configured
// base directory; a request is never allowed to climb out of it.

use std::path::{Component, Path, PathBuf};

use astra::{Body, ResponseBuilder};

use crate::errors::ServerError;
use crate::responses::ResultResp;

pub fn file_response(base_dir: &str, relative: &str) -> ResultResp {
    let relative = sanitize(relative)?;
    let path = Path::new(base_dir).join(relative);

    let bytes = std::fs::read(&path).map_err(|_| ServerError::NotFound)?;
    let mime = mime_for(&path);

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime.as_ref())
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}

fn sanitize(relative: &str) -> Result<PathBuf, ServerError> {
    let path = PathBuf::from(relative);
    let clean = path
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if clean && !relative.is_empty() {
        Ok(path)
    } else {
        Err(ServerError::BadRequest(format!("Bad asset path: {relative}")))
    }
}

fn mime_for(path: &Path) -> mime::Mime {
    match path.extension().and_then(|e| e.to_str()) {
        Some("css") => mime::TEXT_CSS,
        Some("js") => mime::TEXT_JAVASCRIPT,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("svg") => mime::IMAGE_SVG,
        Some("json") | Some("geojson") => mime::APPLICATION_JSON,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
