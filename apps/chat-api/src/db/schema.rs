diesel::table! {
    users (id) {
        id -> Text,
        email -> Text,
        role -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    chat_messages (id) {
        id -> Text,
        user_id -> Text,
        user_email -> Text,
        role -> Text,
        text -> Text,
        created_at -> Timestamptz,
    }
}
