pub mod order_pipeline;
