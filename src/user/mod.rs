//! Users, their stored details and the profile endpoints.

mod db;
mod domain;
mod profile;

#[cfg(test)]
pub use db::count_users;
pub use db::{
    NewUser, UserChanges, create_user, create_user_table, delete_user, get_user_by_email,
    get_user_by_id, update_password, update_user,
};
pub use domain::{Currency, Email, User, UserId, UserName};
pub use profile::{delete_profile, get_profile, update_profile};
