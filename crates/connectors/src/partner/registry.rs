use crate::{
    error::PartnerError,
    partner::{Partner, changenow::ChangeNow, godex::Godex},
};
use std::sync::Arc;

/// Every built-in partner, in a stable order.
pub fn all() -> Vec<Arc<dyn Partner>> {
    vec![Arc::new(ChangeNow::new()), Arc::new(Godex::new())]
}

pub fn by_id(id: &str) -> Result<Arc<dyn Partner>, PartnerError> {
    all()
        .into_iter()
        .find(|p| p.id().eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| PartnerError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::pagination::cursor::CursorKind;

    #[test]
    fn looks_up_by_id() {
        let p = by_id("godex").unwrap();
        assert_eq!(p.name(), "Godex");
        assert_eq!(p.cursor_kind(), CursorKind::Watermark);

        let p = by_id(" ChangeNow ").unwrap();
        assert_eq!(p.id(), "changenow");
        assert_eq!(p.cursor_kind(), CursorKind::Offset);

        assert!(matches!(by_id("nope"), Err(PartnerError::NotFound(_))));
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = all().iter().map(|p| p.id()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
