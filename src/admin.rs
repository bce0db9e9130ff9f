//! Editing capabilities of each entity type, described as data.
//!
//! Rather than a hand-built screen per entity, the management UI is driven
//! by this registry: which fields an editing form shows, which columns a
//! listing shows, what a search matches, and which related records are
//! edited inline. Clients fetch the registry once and render from it.

/// Field names shown for temporal start components.
const TEMPORAL_START: [&str; 4] =
    ["start_year", "start_month", "start_day", "start_time"];

/// Field names shown for temporal end components.
const TEMPORAL_END: [&str; 4] =
    ["end_year", "end_month", "end_day", "end_time"];

/// Editing capabilities of one entity type.
#[derive(Debug, Serialize)]
pub struct EntityAdmin {
    /// Entity type this entry describes.
    pub entity: &'static str,
    /// Fields shown on the editing form, in form order.
    pub fields: &'static [&'static str],
    /// Columns of the listing. Empty means a single name column.
    pub list_display: &'static [&'static str],
    /// Listing columns that link to the record.
    pub list_display_links: &'static [&'static str],
    /// Fields matched by listing search. Empty disables search.
    pub search_fields: &'static [&'static str],
    /// Field the slug is prefilled from while typing, if any.
    pub slug_from: Option<&'static str>,
    /// Related records edited inline on this entity's form.
    pub inlines: &'static [Inline],
    /// Text shown in place of an unset value.
    pub empty_value: &'static str,
}

/// One block of related records edited inline on a parent form.
#[derive(Debug, Serialize)]
pub struct Inline {
    /// Entity type of the inline records.
    pub entity: &'static str,
    /// Fields shown per inline row.
    pub fields: &'static [&'static str],
    /// Field the rows can be reordered by, if any.
    pub sortable_by: Option<&'static str>,
    /// Blank rows offered for new records.
    pub extra: u32,
}

/// The full registry, one entry per editable entity type.
pub static REGISTRY: [EntityAdmin; 9] = [
    EntityAdmin {
        entity: "world",
        fields: &["name", "slug"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &[],
        slug_from: Some("name"),
        inlines: &[],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "place",
        fields: &["world", "name", "slug", "point_location", "geo_detail",
            "tags", "notes"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &["name"],
        slug_from: Some("name"),
        inlines: &[],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "setting",
        fields: &["world", "name", "slug", "tags", "notes"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &["name"],
        slug_from: Some("name"),
        inlines: &[],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "organization",
        fields: &["world", "name", "slug", "time_type",
            "start_year", "start_month", "start_day", "start_time",
            "end_year", "end_month", "end_day", "end_time",
            "tags", "notes"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &["name"],
        slug_from: Some("name"),
        inlines: &[],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "character",
        fields: &["world", "name", "slug",
            "start_year", "start_month", "start_day", "start_time",
            "end_year", "end_month", "end_day", "end_time",
            "tags", "notes"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &["name"],
        slug_from: Some("name"),
        inlines: &[
            Inline {
                entity: "family-tie",
                fields: &["parent", "birth_order"],
                sortable_by: Some("birth_order"),
                extra: 1,
            },
            Inline {
                entity: "family-tie",
                fields: &["child", "birth_order"],
                sortable_by: Some("birth_order"),
                extra: 1,
            },
            Inline {
                entity: "title",
                fields: &["place", "rank"],
                sortable_by: None,
                extra: 1,
            },
            Inline {
                entity: "honor",
                fields: &["organization",
                    "start_year", "start_month", "start_day",
                    "end_year", "end_month", "end_day"],
                sortable_by: None,
                extra: 1,
            },
        ],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "event",
        fields: &["world", "name", "slug", "time_type",
            "start_year", "start_month", "start_day", "start_time",
            "end_year", "end_month", "end_day", "end_time",
            "place", "tags", "notes"],
        list_display: &["start_year", "start_month", "start_day", "name"],
        list_display_links: &["name"],
        search_fields: &["name"],
        slug_from: Some("name"),
        inlines: &[
            Inline {
                entity: "participation",
                fields: &["character", "role"],
                sortable_by: None,
                extra: 1,
            },
        ],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "participation",
        fields: &["event", "character", "role", "time_type",
            "start_year", "start_month", "start_day", "start_time",
            "end_year", "end_month", "end_day", "end_time"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &[],
        slug_from: None,
        inlines: &[],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "family-tie",
        fields: &["parent", "child", "birth_order"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &[],
        slug_from: None,
        inlines: &[],
        empty_value: "unknown",
    },
    EntityAdmin {
        entity: "reference",
        fields: &["url", "cite"],
        list_display: &[],
        list_display_links: &[],
        search_fields: &[],
        slug_from: None,
        inlines: &[],
        empty_value: "unknown",
    },
];

/// Find the registry entry for an entity type.
pub fn for_entity(entity: &str) -> Option<&'static EntityAdmin> {
    REGISTRY.iter().find(|a| a.entity == entity)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn entities_are_unique() {
        let mut seen = HashSet::new();

        for admin in &REGISTRY {
            assert!(seen.insert(admin.entity),
                "duplicate registry entry for {}", admin.entity);
        }
    }

    #[test]
    fn listing_links_are_listing_columns() {
        for admin in &REGISTRY {
            for link in admin.list_display_links {
                assert!(admin.list_display.contains(link),
                    "{}: link column {} not in list_display",
                    admin.entity, link);
            }
        }
    }

    #[test]
    fn slug_sources_are_form_fields() {
        for admin in &REGISTRY {
            if let Some(source) = admin.slug_from {
                assert!(admin.fields.contains(&source),
                    "{}: slug source {} not in fields", admin.entity, source);
                assert!(admin.fields.contains(&"slug"),
                    "{}: slug_from set but no slug field", admin.entity);
            }
        }
    }

    #[test]
    fn search_fields_are_form_fields() {
        for admin in &REGISTRY {
            for field in admin.search_fields {
                assert!(admin.fields.contains(field),
                    "{}: search field {} not in fields", admin.entity, field);
            }
        }
    }

    #[test]
    fn sortable_inline_columns_are_inline_fields() {
        for admin in &REGISTRY {
            for inline in admin.inlines {
                if let Some(field) = inline.sortable_by {
                    assert!(inline.fields.contains(&field),
                        "{}: inline {} sorts by {} which it does not show",
                        admin.entity, inline.entity, field);
                }
            }
        }
    }

    #[test]
    fn inlines_show_at_least_one_field() {
        for admin in &REGISTRY {
            for inline in admin.inlines {
                assert!(!inline.fields.is_empty(),
                    "{}: inline {} shows no fields",
                    admin.entity, inline.entity);
            }
        }
    }

    #[test]
    fn join_rows_edited_inline_are_also_registered() {
        // Family ties and participations have their own editing screens in
        // addition to the inline blocks.
        assert!(for_entity("family-tie").is_some());
        assert!(for_entity("participation").is_some());
    }

    #[test]
    fn temporal_forms_show_whole_components() {
        for admin in &REGISTRY {
            let has_start = admin.fields.contains(&"start_year");
            let has_end = admin.fields.contains(&"end_year");

            if has_start {
                for field in &TEMPORAL_START {
                    assert!(admin.fields.contains(field),
                        "{}: missing {}", admin.entity, field);
                }
            }

            if has_end {
                for field in &TEMPORAL_END {
                    assert!(admin.fields.contains(field),
                        "{}: missing {}", admin.entity, field);
                }
            }
        }
    }
}
