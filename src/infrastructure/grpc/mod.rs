//! gRPC surface: the purchases client and the tours server.

pub mod purchases;
mod purchases_client;
pub mod tours;
mod tours_server;

pub use purchases_client::PurchasesGrpcClient;
pub use tours_server::{serve as serve_tours, ToursGrpcService};
