//! Shared wire models for the storefront catalog
//!
//! Entity shapes exchanged between the server, the admin surface and the
//! storefront. IDs are opaque strings; prices are integer cents.

pub mod models;

pub use models::{
    Category, CategoryCreate, CategoryUpdate, ColorVariant, ColorVariantInput, Image,
    LegacyProduct, Product, ProductCreate, ProductRecord, ProductUpdate, SizeOption, SizeVariant,
    SizeVariantInput, SubCategory, SubCategoryCreate, SubCategoryUpdate, VariantView,
};
