/// The columns a student listing may be ordered by.
///
/// Request text is mapped onto this enum before it gets anywhere near SQL;
/// the column name in the query only ever comes from [`SortColumn::as_sql`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Id,
    Nim,
    Name,
    Score,
}

impl SortColumn {
    /// Parses a `sort_by` query value. Unknown values fall back to `Id`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => SortColumn::Id,
            "nim" | "number" => SortColumn::Nim,
            "nama" | "name" => SortColumn::Name,
            "nilai" | "score" => SortColumn::Score,
            _ => SortColumn::default(),
        }
    }

    /// The storage column this variant orders by.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Nim => "nim",
            SortColumn::Name => "nama",
            SortColumn::Score => "nilai",
        }
    }

    /// The canonical query-string spelling, used when rendering sort links.
    pub fn as_param(&self) -> &'static str {
        self.as_sql()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses an `order` query value. Unknown values fall back to `Asc`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => SortOrder::default(),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Returns the opposite direction
    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}
