//! Wire models shared between the API server and its clients

pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use cart::{CartAdd, CartLine, CartUpdate};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, PaymentInfo, UnknownOrderStatus,
};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use review::{Review, ReviewCreate, ReviewWithAuthor};
pub use user::{GENDERS, User, UserProfile, UserPublic};
