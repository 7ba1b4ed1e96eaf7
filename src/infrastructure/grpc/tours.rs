//! Messages and server stub for `proto/tours.proto` (package `tours`).
//!
//! Kept in the shape `tonic-build` emits so the build needs no `protoc`.

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct VerifyTourRequest {
    #[prost(int64, tag = "1")]
    pub tour_id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VerifyTourResponse {
    #[prost(bool, tag = "1")]
    pub exists: bool,
    #[prost(bool, tag = "2")]
    pub is_published: bool,
    #[prost(string, tag = "3")]
    pub name: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub price: f64,
    #[prost(string, tag = "5")]
    pub error: ::prost::alloc::string::String,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct VerifyTokenRequest {
    #[prost(int64, tag = "1")]
    pub user_id: i64,
    #[prost(int64, tag = "2")]
    pub tour_id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VerifyTokenResponse {
    #[prost(bool, tag = "1")]
    pub has_token: bool,
    #[prost(string, tag = "2")]
    pub error: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReserveToursRequest {
    #[prost(int64, tag = "1")]
    pub user_id: i64,
    #[prost(int64, repeated, tag = "2")]
    pub tour_ids: ::prost::alloc::vec::Vec<i64>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReserveToursResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, tag = "2")]
    pub error: ::prost::alloc::string::String,
}
/// Server for `tours.ToursService`.
pub mod tours_service_server {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    #[async_trait]
    pub trait ToursService: Send + Sync + 'static {
        async fn verify_tour_exists(
            &self,
            request: tonic::Request<super::VerifyTourRequest>,
        ) -> std::result::Result<tonic::Response<super::VerifyTourResponse>, tonic::Status>;
        async fn verify_purchase_token(
            &self,
            request: tonic::Request<super::VerifyTokenRequest>,
        ) -> std::result::Result<tonic::Response<super::VerifyTokenResponse>, tonic::Status>;
        async fn reserve_tours(
            &self,
            request: tonic::Request<super::ReserveToursRequest>,
        ) -> std::result::Result<tonic::Response<super::ReserveToursResponse>, tonic::Status>;
    }
    #[derive(Debug)]
    pub struct ToursServiceServer<T: ToursService> {
        inner: Arc<T>,
        accept_compression_encodings: EnabledCompressionEncodings,
        send_compression_encodings: EnabledCompressionEncodings,
        max_decoding_message_size: Option<usize>,
        max_encoding_message_size: Option<usize>,
    }
    impl<T: ToursService> ToursServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }
        pub fn from_arc(inner: Arc<T>) -> Self {
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
                max_decoding_message_size: None,
                max_encoding_message_size: None,
            }
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.max_decoding_message_size = Some(limit);
            self
        }
    }
    /// Runs one unary call through the prost codec with the server's limits.
    fn unary<T, S, Req, B>(server: &ToursServiceServer<T>, method: S, req: http::Request<B>) -> BoxFuture<http::Response<tonic::body::BoxBody>, std::convert::Infallible>
    where
        T: ToursService,
        S: tonic::server::UnaryService<Req> + Send + 'static,
        S::Response: prost::Message + Send + 'static,
        S::Future: Send + 'static,
        Req: prost::Message + Default + Send + 'static,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        let accept_compression_encodings = server.accept_compression_encodings;
        let send_compression_encodings = server.send_compression_encodings;
        let max_decoding_message_size = server.max_decoding_message_size;
        let max_encoding_message_size = server.max_encoding_message_size;
        Box::pin(async move {
            let codec = tonic::codec::ProstCodec::<S::Response, Req>::default();
            let mut grpc = tonic::server::Grpc::new(codec)
                .apply_compression_config(accept_compression_encodings, send_compression_encodings)
                .apply_max_message_size_config(max_decoding_message_size, max_encoding_message_size);
            Ok(grpc.unary(method, req).await)
        })
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for ToursServiceServer<T>
    where
        T: ToursService,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                "/tours.ToursService/VerifyTourExists" => {
                    struct VerifyTourExistsSvc<T: ToursService>(pub Arc<T>);
                    impl<T: ToursService> tonic::server::UnaryService<super::VerifyTourRequest> for VerifyTourExistsSvc<T> {
                        type Response = super::VerifyTourResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<super::VerifyTourRequest>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { <T as ToursService>::verify_tour_exists(&inner, request).await })
                        }
                    }
                    unary::<_, _, super::VerifyTourRequest, _>(self, VerifyTourExistsSvc(self.inner.clone()), req)
                }
                "/tours.ToursService/VerifyPurchaseToken" => {
                    struct VerifyPurchaseTokenSvc<T: ToursService>(pub Arc<T>);
                    impl<T: ToursService> tonic::server::UnaryService<super::VerifyTokenRequest> for VerifyPurchaseTokenSvc<T> {
                        type Response = super::VerifyTokenResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<super::VerifyTokenRequest>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { <T as ToursService>::verify_purchase_token(&inner, request).await })
                        }
                    }
                    unary::<_, _, super::VerifyTokenRequest, _>(self, VerifyPurchaseTokenSvc(self.inner.clone()), req)
                }
                "/tours.ToursService/ReserveTours" => {
                    struct ReserveToursSvc<T: ToursService>(pub Arc<T>);
                    impl<T: ToursService> tonic::server::UnaryService<super::ReserveToursRequest> for ReserveToursSvc<T> {
                        type Response = super::ReserveToursResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<super::ReserveToursRequest>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { <T as ToursService>::reserve_tours(&inner, request).await })
                        }
                    }
                    unary::<_, _, super::ReserveToursRequest, _>(self, ReserveToursSvc(self.inner.clone()), req)
                }
                _ => Box::pin(async move {
                    let mut response = http::Response::new(empty_body());
                    let headers = response.headers_mut();
                    headers.insert("grpc-status", http::HeaderValue::from(tonic::Code::Unimplemented as i32));
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        http::HeaderValue::from_static("application/grpc"),
                    );
                    Ok(response)
                }),
            }
        }
    }
    impl<T: ToursService> Clone for ToursServiceServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
                max_decoding_message_size: self.max_decoding_message_size,
                max_encoding_message_size: self.max_encoding_message_size,
            }
        }
    }
    impl<T: ToursService> tonic::server::NamedService for ToursServiceServer<T> {
        const NAME: &'static str = "tours.ToursService";
    }
}
