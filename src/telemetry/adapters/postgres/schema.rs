//! Diesel schema for telemetry persistence.

diesel::table! {
    /// Verbatim telemetry payloads.
    raw_data (id) {
        /// Internal record identifier.
        id -> Uuid,
        /// Host the payload describes.
        #[max_length = 255]
        host -> Varchar,
        /// Payload as JSONB.
        payload -> Jsonb,
        /// Receipt timestamp.
        received_at -> Timestamptz,
    }
}

diesel::table! {
    /// Flattened attribute rows.
    system_info (id) {
        /// Internal row identifier.
        id -> Uuid,
        /// Host the attribute belongs to.
        #[max_length = 255]
        host -> Varchar,
        /// Attribute name.
        attribute_name -> Text,
        /// Attribute value text.
        attribute_value -> Text,
        /// Recording timestamp.
        recorded_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(raw_data, system_info);
