pub mod scripted_ledger;
