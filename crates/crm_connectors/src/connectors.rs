pub mod trustcommerce;

pub use trustcommerce::Trustcommerce;
