//! Catalog Models

pub mod category;
pub mod product;
pub mod sub_category;
pub mod variant_view;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use product::{
    ColorVariant, ColorVariantInput, Image, LegacyProduct, Product, ProductCreate, ProductRecord,
    ProductUpdate, SizeVariant, SizeVariantInput,
};
pub use sub_category::{SubCategory, SubCategoryCreate, SubCategoryUpdate};
pub use variant_view::{SizeOption, VariantView};
