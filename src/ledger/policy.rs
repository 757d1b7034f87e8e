//! Who may check tools in and out

use super::availability::HolderSet;
use crate::models::actor::is_guest_name;

/// Admins may check in anything; everyone else only what they hold.
pub fn can_check_in(actor: &str, holders: &HolderSet, is_admin: bool) -> bool {
    is_admin || holders.holds(actor)
}

/// Any named, non-guest actor may check out.
pub fn can_check_out(actor: &str) -> bool {
    !is_guest_name(actor)
}
