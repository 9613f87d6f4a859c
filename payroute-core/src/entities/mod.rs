pub mod swap_transaction;
