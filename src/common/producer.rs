mod test_producer;

pub use test_producer::TestProducer;
