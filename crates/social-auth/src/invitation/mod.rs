//! Registration invitations.

pub mod ledger;

pub use ledger::InvitationLedger;
