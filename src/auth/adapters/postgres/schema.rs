//! Diesel schema for one-time-code storage.

diesel::table! {
    /// Issued one-time codes.
    otp_codes (id) {
        /// Code identifier.
        id -> Uuid,
        /// Address the code was issued for.
        #[max_length = 255]
        email -> Varchar,
        /// The six digits.
        #[max_length = 6]
        digits -> Varchar,
        /// Issue timestamp.
        created_at -> Timestamptz,
        /// Expiry timestamp.
        expires_at -> Timestamptz,
        /// Whether the code was already used.
        consumed -> Bool,
    }
}
