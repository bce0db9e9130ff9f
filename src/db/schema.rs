table! {
    worlds (id) {
        id -> Int4,
        name -> Varchar,
        slug -> Varchar,
    }
}

table! {
    places (id) {
        id -> Int4,
        world -> Int4,
        name -> Varchar,
        slug -> Varchar,
        notes -> Nullable<Text>,
        point_lon -> Nullable<Float8>,
        point_lat -> Nullable<Float8>,
        geo_detail -> Nullable<Text>,
    }
}

table! {
    settings (id) {
        id -> Int4,
        world -> Int4,
        name -> Varchar,
        slug -> Varchar,
        notes -> Nullable<Text>,
    }
}

table! {
    organizations (id) {
        id -> Int4,
        world -> Int4,
        name -> Varchar,
        slug -> Varchar,
        notes -> Nullable<Text>,
        time_type -> crate::db::types::Time_type,
        start_year -> Nullable<Int4>,
        start_month -> Nullable<Int4>,
        start_day -> Nullable<Int4>,
        start_time -> Nullable<Time>,
        end_year -> Nullable<Int4>,
        end_month -> Nullable<Int4>,
        end_day -> Nullable<Int4>,
        end_time -> Nullable<Time>,
    }
}

table! {
    characters (id) {
        id -> Int4,
        world -> Int4,
        name -> Varchar,
        slug -> Varchar,
        notes -> Nullable<Text>,
        time_type -> crate::db::types::Time_type,
        start_year -> Nullable<Int4>,
        start_month -> Nullable<Int4>,
        start_day -> Nullable<Int4>,
        start_time -> Nullable<Time>,
        end_year -> Nullable<Int4>,
        end_month -> Nullable<Int4>,
        end_day -> Nullable<Int4>,
        end_time -> Nullable<Time>,
    }
}

table! {
    events (id) {
        id -> Int4,
        world -> Int4,
        name -> Varchar,
        slug -> Varchar,
        notes -> Nullable<Text>,
        place -> Nullable<Int4>,
        time_type -> crate::db::types::Time_type,
        start_year -> Nullable<Int4>,
        start_month -> Nullable<Int4>,
        start_day -> Nullable<Int4>,
        start_time -> Nullable<Time>,
        end_year -> Nullable<Int4>,
        end_month -> Nullable<Int4>,
        end_day -> Nullable<Int4>,
        end_time -> Nullable<Time>,
    }
}

table! {
    family_ties (id) {
        id -> Int4,
        parent -> Int4,
        child -> Int4,
        birth_order -> Int4,
    }
}

table! {
    event_participations (id) {
        id -> Int4,
        character -> Int4,
        event -> Int4,
        role -> Varchar,
        time_type -> crate::db::types::Time_type,
        start_year -> Nullable<Int4>,
        start_month -> Nullable<Int4>,
        start_day -> Nullable<Int4>,
        start_time -> Nullable<Time>,
        end_year -> Nullable<Int4>,
        end_month -> Nullable<Int4>,
        end_day -> Nullable<Int4>,
        end_time -> Nullable<Time>,
    }
}

table! {
    titles (id) {
        id -> Int4,
        character -> Int4,
        place -> Int4,
        rank -> Varchar,
        time_type -> crate::db::types::Time_type,
        start_year -> Nullable<Int4>,
        start_month -> Nullable<Int4>,
        start_day -> Nullable<Int4>,
        start_time -> Nullable<Time>,
        end_year -> Nullable<Int4>,
        end_month -> Nullable<Int4>,
        end_day -> Nullable<Int4>,
        end_time -> Nullable<Time>,
    }
}

table! {
    honors (id) {
        id -> Int4,
        character -> Int4,
        organization -> Int4,
        time_type -> crate::db::types::Time_type,
        start_year -> Nullable<Int4>,
        start_month -> Nullable<Int4>,
        start_day -> Nullable<Int4>,
        start_time -> Nullable<Time>,
        end_year -> Nullable<Int4>,
        end_month -> Nullable<Int4>,
        end_day -> Nullable<Int4>,
        end_time -> Nullable<Time>,
    }
}

table! {
    references (id) {
        id -> Int4,
        url -> Varchar,
        cite -> Nullable<Varchar>,
    }
}

table! {
    tags (id) {
        id -> Int4,
        name -> Varchar,
    }
}

table! {
    taggings (id) {
        id -> Int4,
        tag -> Int4,
        item_kind -> Varchar,
        item_id -> Int4,
    }
}

joinable!(places -> worlds (world));
joinable!(settings -> worlds (world));
joinable!(organizations -> worlds (world));
joinable!(characters -> worlds (world));
joinable!(events -> worlds (world));
joinable!(events -> places (place));
joinable!(event_participations -> characters (character));
joinable!(event_participations -> events (event));
joinable!(titles -> characters (character));
joinable!(titles -> places (place));
joinable!(honors -> characters (character));
joinable!(honors -> organizations (organization));
joinable!(taggings -> tags (tag));

allow_tables_to_appear_in_same_query!(
    worlds,
    places,
    settings,
    organizations,
    characters,
    events,
    family_ties,
    event_participations,
    titles,
    honors,
    references,
    tags,
    taggings,
);
