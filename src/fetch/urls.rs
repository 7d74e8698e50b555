// src/fetch/urls.rs

use url::Url;

use crate::{
    error::{Error, Result},
    types::Category,
};

/// `{base}/{project_id}/{category}`.
///
/// A trailing slash on `base` is tolerated; `project_id` is pushed as a
/// single percent-encoded segment.
pub fn category_url(base: &Url, project_id: &str, category: Category) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::config(format!("base URL {} cannot carry a path", base)))?
        .pop_if_empty()
        .push(project_id)
        .push(category.as_str());
    Ok(url)
}
