//! Messages and client stub for `proto/purchases.proto` (package `purchases`).
//!
//! Kept in the shape `tonic-build` emits so the build needs no `protoc`.

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct VerifyPurchaseRequest {
    #[prost(int64, tag = "1")]
    pub user_id: i64,
    #[prost(int64, tag = "2")]
    pub tour_id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VerifyPurchaseResponse {
    #[prost(bool, tag = "1")]
    pub has_purchased: bool,
    #[prost(string, tag = "2")]
    pub token_id: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub purchased_at: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub error: ::prost::alloc::string::String,
}
/// Client for `purchases.PurchasesService`.
pub mod purchases_service_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    use tonic::codegen::http::Uri;
    #[derive(Debug, Clone)]
    pub struct PurchasesServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl PurchasesServiceClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> PurchasesServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }
        pub async fn verify_purchase(
            &mut self,
            request: impl tonic::IntoRequest<super::VerifyPurchaseRequest>,
        ) -> std::result::Result<
            tonic::Response<super::VerifyPurchaseResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/purchases.PurchasesService/VerifyPurchase",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("purchases.PurchasesService", "VerifyPurchase"));
            self.inner.unary(req, path, codec).await
        }
    }
}
