use slab::Slab;

use crate::models::{OrderId, Price, Quantity, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestingOrder {
    pub order_id: OrderId,
    pub price: Price,
    pub remaining: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
    pub removed: bool,
    pub remaining: Quantity,
}

/// One side of one instrument's book. Plain data; the owning
/// `InstrumentBook` wraps it in a mutex.
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    orders: Slab<RestingOrder>,
    volume: Quantity,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            orders: Slab::new(),
            volume: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn insert(&mut self, order_id: OrderId, price: Price, quantity: Quantity) -> usize {
        debug_assert!(quantity > 0, "resting orders carry positive quantity");
        self.volume += quantity;
        self.orders.insert(RestingOrder {
            order_id,
            price,
            remaining: quantity,
        })
    }

    /// Key of the order with the extreme price: highest for the buy side,
    /// lowest for the sell side. Equal prices resolve to the earliest
    /// arrival (lowest order id).
    pub fn best(&self) -> Option<usize> {
        let mut best: Option<(usize, &RestingOrder)> = None;
        for (key, order) in self.orders.iter() {
            let better = match best {
                None => true,
                Some((_, incumbent)) if order.price == incumbent.price => {
                    order.order_id < incumbent.order_id
                }
                Some((_, incumbent)) => match self.side {
                    Side::Buy => order.price > incumbent.price,
                    Side::Sell => order.price < incumbent.price,
                },
            };
            if better {
                best = Some((key, order));
            }
        }
        best.map(|(key, _)| key)
    }

    pub fn get(&self, key: usize) -> Option<&RestingOrder> {
        self.orders.get(key)
    }

    /// Decrements an order's remaining quantity, unlinking it the moment it
    /// reaches zero. Overdraw is an invariant breach, not an error.
    pub fn fill(&mut self, key: usize, quantity: Quantity) -> FillOutcome {
        let order = self
            .orders
            .get_mut(key)
            .expect("fill targets a live order on this side");
        assert!(
            quantity > 0 && quantity <= order.remaining,
            "fill of {quantity} overdraws order {} with {} remaining",
            order.order_id,
            order.remaining,
        );
        order.remaining -= quantity;
        self.volume -= quantity;
        let remaining = order.remaining;
        let removed = remaining == 0;
        if removed {
            self.orders.remove(key);
        }
        FillOutcome { removed, remaining }
    }

    pub fn remove(&mut self, key: usize) -> Option<RestingOrder> {
        let order = self.orders.try_remove(key)?;
        self.volume -= order.remaining;
        Some(order)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total quantity resting across all price levels.
    pub fn resting_volume(&self) -> Quantity {
        self.volume
    }

    /// Best price with the quantity resting at that price.
    pub fn best_level(&self) -> Option<(Price, Quantity)> {
        let key = self.best()?;
        let price = self.orders[key].price;
        let quantity = self
            .orders
            .iter()
            .filter(|(_, order)| order.price == price)
            .map(|(_, order)| order.remaining)
            .sum();
        Some((price, quantity))
    }
}
