//! Diesel schema for critical point persistence.

diesel::table! {
    /// Threshold definitions keyed by attribute name.
    critical_points (attribute_name) {
        /// Attribute name key.
        #[max_length = 255]
        attribute_name -> Varchar,
        /// Lower bound.
        min_value -> Nullable<Float8>,
        /// Upper bound.
        max_value -> Nullable<Float8>,
        /// Exact expected value.
        exact_value -> Nullable<Float8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
