pub mod a001_product_profile;
pub mod a002_return_record;
