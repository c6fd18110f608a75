//! Point id derivation.

use qdrant_client::qdrant::PointId;
use qdrant_client::qdrant::point_id::PointIdOptions;
use uuid::Uuid;

use crate::errors::QdrantSinkError;

/// Deterministic UUIDv5 from an arbitrary string id.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

/// Maps a document id onto a Qdrant point id.
///
/// - empty → random UUIDv4
/// - unsigned integer → numeric id
/// - UUID → used as is (the nil UUID is reserved)
/// - anything else → [`stable_uuid`]
pub fn point_id_for(doc_id: &str) -> Result<PointId, QdrantSinkError> {
    let id = doc_id.trim();
    if id.is_empty() {
        return Ok(Uuid::new_v4().to_string().into());
    }
    if let Ok(n) = id.parse::<u64>() {
        return Ok(n.into());
    }
    if let Ok(u) = Uuid::parse_str(id) {
        if u.is_nil() {
            return Err(QdrantSinkError::Conversion(
                "nil UUID cannot be used as a point id".into(),
            ));
        }
        return Ok(u.to_string().into());
    }
    Ok(stable_uuid(id).to_string().into())
}

/// Reserved point used as the target of the flush barrier.
pub(crate) fn barrier_point() -> PointId {
    Uuid::nil().to_string().into()
}

/// String form of a point id, if it has one.
pub fn point_id_string(pid: &PointId) -> Option<String> {
    match pid.point_id_options.as_ref()? {
        PointIdOptions::Uuid(s) => Some(s.clone()),
        PointIdOptions::Num(n) => Some(n.to_string()),
    }
}
