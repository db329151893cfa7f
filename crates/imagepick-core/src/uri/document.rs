use super::ContentUri;

const PATH_DOCUMENT: &str = "document";
const PATH_TREE: &str = "tree";

/// The document ID of a document-provider URI.
///
/// Accepts `content://<authority>/document/<id>` and
/// `content://<authority>/tree/<tree-id>/document/<id>`.
pub fn document_id(uri: &ContentUri) -> Option<String> {
    if uri.scheme() != "content" || uri.authority().is_none() {
        return None;
    }

    let mut segments = uri.path_segments();
    match segments.as_slice() {
        [first, _] if first == PATH_DOCUMENT => segments.pop(),
        [first, _, third, _] if first == PATH_TREE && third == PATH_DOCUMENT => segments.pop(),
        _ => None,
    }
}

pub fn is_document_uri(uri: &ContentUri) -> bool {
    document_id(uri).is_some()
}
