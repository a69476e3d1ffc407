mod meta;
pub use self::meta::{CustomerPage, RemotePagination};

mod customer;
pub use self::customer::{value_text, Customer, Document, MembershipTier, TIER_DISPLAY_KEY};
