use time::{macros::format_description, OffsetDateTime};

pub(crate) fn timestamp_slug(at: OffsetDateTime) -> String {
    at.format(&format_description!(
        "[year][month][day]_[hour][minute][second]"
    ))
    .unwrap_or_else(|_| "export".into())
}

/// `yuletype-<tag>-<timestamp>.<extension>`
pub(crate) fn export_filename(tag: &str, extension: &str, at: OffsetDateTime) -> String {
    format!("yuletype-{tag}-{}.{extension}", timestamp_slug(at))
}
