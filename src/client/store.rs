use crate::models::CartLine;
use crate::services::checkout_service::compute_total;

/// The fields of a catalog product the cart needs to remember. The price
/// recorded here becomes the line's snapshot price.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Action {
    AddToCart { product: ProductSummary, quantity: u32 },
    RemoveFromCart { product_id: i64 },
    UpdateQuantity { product_id: i64, quantity: u32 },
    /// Server wins: the persisted cart replaces whatever is held locally.
    ReplaceCart { lines: Vec<CartLine> },
    AddToWishlist { product_id: i64 },
    RemoveFromWishlist { product_id: i64 },
    ReplaceWishlist { product_ids: Vec<i64> },
    /// Logout: drop the local mirror only; the server copy persists.
    ClearLocal,
}

/// Application state store with a single authoritative update path.
///
/// `dirty` tracks whether the local cart has mutations the server has not
/// seen yet; a failed persist leaves it set so the push is retried on the
/// next mutation or flush.
#[derive(Debug, Default)]
pub struct Store {
    cart: Vec<CartLine>,
    wishlist: Vec<i64>,
    dirty: bool,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn wishlist(&self) -> &[i64] {
        &self.wishlist
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_synced(&mut self) {
        self.dirty = false;
    }

    pub fn cart_total(&self) -> f64 {
        compute_total(&self.cart)
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::AddToCart { product, quantity } => {
                let quantity = quantity.max(1);
                if let Some(line) = self.cart.iter_mut().find(|l| l.product_id == product.id) {
                    // Merge into the existing line; the snapshot price from
                    // the first add stays.
                    line.quantity += quantity;
                } else {
                    self.cart.push(CartLine {
                        product_id: product.id,
                        name: product.name,
                        price: product.price,
                        images: product.images,
                        quantity,
                    });
                }
                self.dirty = true;
            }
            Action::RemoveFromCart { product_id } => {
                let before = self.cart.len();
                self.cart.retain(|l| l.product_id != product_id);
                // Removing an absent line is a no-op, not an error.
                if self.cart.len() != before {
                    self.dirty = true;
                }
            }
            Action::UpdateQuantity {
                product_id,
                quantity,
            } => {
                if quantity == 0 {
                    return;
                }
                if let Some(line) = self.cart.iter_mut().find(|l| l.product_id == product_id) {
                    if line.quantity != quantity {
                        line.quantity = quantity;
                        self.dirty = true;
                    }
                }
            }
            Action::ReplaceCart { lines } => {
                self.cart = lines;
                self.dirty = false;
            }
            Action::AddToWishlist { product_id } => {
                if !self.wishlist.contains(&product_id) {
                    self.wishlist.push(product_id);
                }
            }
            Action::RemoveFromWishlist { product_id } => {
                self.wishlist.retain(|id| *id != product_id);
            }
            Action::ReplaceWishlist { product_ids } => {
                self.wishlist = product_ids;
            }
            Action::ClearLocal => {
                self.cart.clear();
                self.wishlist.clear();
                self.dirty = false;
            }
        }
    }
}
