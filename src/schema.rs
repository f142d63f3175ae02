// Collections are created on demand by `PgStore::ensure_collections`.

diesel::table! {
    folder (id) {
        id -> Uuid,
        name -> Text,
        color -> Nullable<Text>,
        icon -> Nullable<Text>,
    }
}

diesel::table! {
    note (id) {
        id -> Uuid,
        title -> Text,
        content -> Text,
        folder_id -> Nullable<Text>,
        tags -> Array<Text>,
        pinned -> Bool,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(folder, note);
