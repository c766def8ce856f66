//! Protobuf messages delivered on the agents channel.

#[derive(Clone, PartialEq, prost::Message)]
pub struct PAgent {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(double, repeated, tag = "2")]
    pub point: Vec<f64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PAgents {
    #[prost(message, repeated, tag = "1")]
    pub agents: Vec<PAgent>,
}
