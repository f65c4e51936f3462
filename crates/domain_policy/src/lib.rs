//! Policy domain - the payment/lapse cycle that keeps cover in force
//!
//! A policy accrues one premium per completed 30-day period from its start
//! date. Payments are append-only ledger entries; they never change status
//! by themselves. The lapse evaluator runs as a separate batch pass and
//! lapses any active policy more than one full premium behind. Keeping the
//! two apart means a late payment arriving after a lapse run is still on
//! record before any reinstatement question arises.

pub mod lapse;
pub mod ledger;
pub mod policy;
pub mod ports;

pub use lapse::{LapseEvaluator, LapseSummary};
pub use ledger::{compute_arrears, PolicyLedger};
pub use policy::{Payment, Policy, PolicyStatus};
pub use ports::{
    NewPolicy, NotificationSender, PaymentStore, PolicyStore, PolicyUpdate, RetailSyncPort,
};
