pub mod client;
pub mod models;

pub use client::{RazorpayClient, RazorpayError};
pub use models::{RemoteOrder, RemotePayment};
