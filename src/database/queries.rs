pub mod users {
    pub const SELECT_ID_BY_EMAIL: &str = r#"
    SELECT id
      FROM users
     WHERE email = ?
    "#;

    pub const INSERT: &str = r#"
    INSERT INTO users (
        name
      , email
      , hashed_password
      , user_type
      , address
      , latitude
      , longitude
    ) VALUES (?, ?, ?, ?, ?, ?, ?)
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT id
         , name
         , email
         , user_type
         , address
         , latitude
         , longitude
         , is_active
         , created_at
      FROM users
     WHERE id = ?
    "#;

    pub const SELECT_COORDINATE: &str = r#"
    SELECT latitude
         , longitude
      FROM users
     WHERE id = ?
    "#;

    pub const UPDATE_COORDINATE: &str = r#"
    UPDATE users
       SET latitude = ?
         , longitude = ?
     WHERE id = ?
    "#;
}

pub mod auth {
    pub const SELECT_USER_BY_EMAIL: &str = r#"
    SELECT id
         , name
         , email
         , user_type
         , hashed_password
         , is_active
      FROM users
     WHERE email = ?
    "#;

    pub const SELECT_USER_FOR_TOKEN: &str = r#"
    SELECT id
         , name
         , email
         , user_type
         , is_active
      FROM users
     WHERE id = ?
    "#;

    pub const SELECT_PASSWORD_HASH: &str = r#"
    SELECT hashed_password
      FROM users
     WHERE id = ?
    "#;

    pub const UPDATE_PASSWORD: &str = r#"
    UPDATE users
       SET hashed_password = ?
     WHERE id = ?
    "#;

    pub const INSERT_REFRESH_TOKEN: &str = r#"
    INSERT INTO refresh_tokens (
        token_hash
      , user_id
      , expires_at
    ) VALUES (?, ?, ?)
    "#;

    pub const VALIDATE_REFRESH_TOKEN: &str = r#"
    SELECT rt.id
         , rt.user_id
         , rt.expires_at
         , rt.revoked
         , u.name
         , u.user_type
         , u.is_active
      FROM refresh_tokens AS rt
      JOIN users AS u ON rt.user_id = u.id
     WHERE rt.token_hash = ?
    "#;

    pub const REVOKE_REFRESH_TOKEN: &str = r#"
    UPDATE refresh_tokens
       SET revoked = 1
     WHERE id = ?
    "#;

    pub const REVOKE_REFRESH_TOKEN_BY_HASH: &str = r#"
    UPDATE refresh_tokens
       SET revoked = 1
     WHERE token_hash = ?
    "#;

    pub const REVOKE_ALL_USER_TOKENS: &str = r#"
    UPDATE refresh_tokens
       SET revoked = 1
     WHERE user_id = ?
    "#;

    pub const DELETE_REVOKED_TOKEN: &str = r#"
    DELETE FROM refresh_tokens
     WHERE revoked = 1
       AND id = ?
    "#;

    pub const DELETE_STALE_TOKENS: &str = r#"
    DELETE FROM refresh_tokens
     WHERE revoked = 1
        OR datetime(expires_at) < datetime('now')
    "#;
}

pub mod deals {
    pub const INSERT: &str = r#"
    INSERT INTO deals (
        restaurant_id
      , title
      , description
      , quantity
      , original_price
      , updated_price
      , pickup_start
      , pickup_end
      , claimed
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT id
         , restaurant_id
         , title
         , description
         , quantity
         , original_price
         , updated_price
         , pickup_start
         , pickup_end
         , claimed
         , created_at
      FROM deals
     WHERE id = ?
    "#;

    pub const SELECT_FOR_RESTAURANT: &str = r#"
    SELECT id
         , restaurant_id
         , title
         , description
         , quantity
         , original_price
         , updated_price
         , pickup_start
         , pickup_end
         , claimed
         , created_at
      FROM deals
     WHERE restaurant_id = ?
     ORDER BY created_at DESC, id DESC
    "#;

    pub const SELECT_UNCLAIMED: &str = r#"
    SELECT id
         , restaurant_id
         , title
         , description
         , quantity
         , original_price
         , updated_price
         , pickup_start
         , pickup_end
         , claimed
         , created_at
      FROM deals
     WHERE claimed = 0
     ORDER BY created_at DESC, id DESC
    "#;

    pub const CHECK_OWNERSHIP: &str = r#"
    SELECT id
      FROM deals
     WHERE id = ?
       AND restaurant_id = ?
    "#;

    pub const CHECK_EXISTS: &str = r#"
    SELECT id
      FROM deals
     WHERE id = ?
    "#;

    pub const DELETE: &str = r#"
    DELETE FROM deals
     WHERE id = ?
    "#;

    /// Check-and-set guard: zero rows updated means the deal is gone or
    /// already claimed, and the caller distinguishes the two.
    pub const MARK_CLAIMED: &str = r#"
    UPDATE deals
       SET claimed = 1
     WHERE id = ?
       AND claimed = 0
    "#;

    pub const INSERT_IMAGE: &str = r#"
    INSERT OR REPLACE INTO deal_images (deal_id, url)
    VALUES (?, ?)
    "#;

    pub const SELECT_IMAGE: &str = r#"
    SELECT url
      FROM deal_images
     WHERE deal_id = ?
    "#;

    pub const SELECT_IMAGES_FOR_DEALS: &str = r#"
    SELECT deal_id
         , url
      FROM deal_images
     WHERE deal_id IN ({})
    "#;
}

pub mod feed {
    pub const SELECT_RESTAURANTS_BY_IDS: &str = r#"
    SELECT id
         , name
         , latitude
         , longitude
      FROM users
     WHERE id IN ({})
    "#;
}

pub mod claims {
    pub const INSERT: &str = r#"
    INSERT INTO claims (
        deal_id
      , customer_id
      , claimed_at
      , confirmed
    ) VALUES (?, ?, ?, 0)
    "#;

    pub const SELECT_FOR_CUSTOMER: &str = r#"
    SELECT c.id
         , c.deal_id
         , c.claimed_at
         , c.confirmed
         , d.title
         , d.description
         , d.quantity
         , d.updated_price
         , d.pickup_start
         , d.pickup_end
         , u.name
      FROM claims AS c
      JOIN deals AS d ON c.deal_id = d.id
      LEFT JOIN users AS u ON d.restaurant_id = u.id
     WHERE c.customer_id = ?
     ORDER BY c.claimed_at DESC, c.id DESC
    "#;
}

pub mod analytics {
    pub const COUNT_DEALS: &str = r#"
    SELECT COUNT(*)
         , COALESCE(SUM(claimed), 0)
      FROM deals
    "#;

    pub const CLAIM_TOTALS: &str = r#"
    SELECT COUNT(*)
         , COALESCE(SUM(d.original_price - d.updated_price), 0)
         , COALESCE(SUM(d.quantity), 0)
      FROM claims AS c
      JOIN deals AS d ON c.deal_id = d.id
    "#;

    pub const MONTHLY_SAVINGS: &str = r#"
    SELECT strftime('%Y-%m', c.claimed_at) AS month
         , COALESCE(SUM(d.original_price - d.updated_price), 0)
      FROM claims AS c
      JOIN deals AS d ON c.deal_id = d.id
     GROUP BY month
     ORDER BY month
    "#;
}
