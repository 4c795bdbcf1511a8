use profiledex_core::{BackendKind, GridSize, SortField};

pub(super) fn parse_backend(raw: &str) -> std::result::Result<BackendKind, String> {
    BackendKind::parse(raw).map_err(|err| err.to_string())
}

pub(super) fn parse_sort_field(raw: &str) -> std::result::Result<SortField, String> {
    raw.parse::<SortField>().map_err(|err| err.to_string())
}

pub(super) fn parse_grid_size(raw: &str) -> std::result::Result<GridSize, String> {
    let columns = raw
        .parse::<u8>()
        .map_err(|_| format!("invalid grid size '{raw}'"))?;
    GridSize::new(columns).map_err(|err| err.to_string())
}
