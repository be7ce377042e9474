//! Order service - placing orders and driving them through delivery.
//!
//! Money moves with the order:
//! - placing debits the client the subtotal plus shipping
//! - delivering credits the restaurant owner the subtotal and the
//!   deliveryman the shipping rate
//! - cancelling refunds the client in full

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::info;

use crate::domain::{
    CreditMovement, NewOrder, Order, OrderFilter, OrderScope, OrderState, OrderTransition,
    PlacedOrder, Role, StateChange, User,
};
use crate::money::Money;
use crate::ports::{
    CoreError, MenuRepository, OrderRepository, RepositoryError, RestaurantRepository,
    SettingsRepository,
};

/// Service for orders.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    menu: Arc<dyn MenuRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        menu: Arc<dyn MenuRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            orders,
            menu,
            restaurants,
            settings,
        }
    }

    /// Place an order for the signed-in client.
    pub async fn place(&self, actor: &User, request: NewOrder) -> Result<Order, CoreError> {
        if !actor.is(Role::Client) {
            return Err(CoreError::denied("only clients can place orders"));
        }
        if request.lines.is_empty() {
            return Err(CoreError::Validation("An order needs at least one item".into()));
        }

        let settings = self.settings.load().await?;
        let max_quantity = settings.effective_max_quantity_per_item();
        let restaurant = self.restaurants.get(&request.restaurant).await?;

        if !restaurant.is_open_at(Local::now().time()) {
            return Err(CoreError::Validation(format!(
                "{} is closed (open {}-{})",
                restaurant.name,
                restaurant.opening_time.format("%H:%M"),
                restaurant.closing_time.format("%H:%M")
            )));
        }

        let mut seen = HashSet::new();
        let mut line_totals = Vec::with_capacity(request.lines.len());
        for &(food_id, quantity) in &request.lines {
            if !seen.insert(food_id) {
                return Err(CoreError::Validation(format!(
                    "Food {food_id} appears more than once"
                )));
            }
            if !(1..=max_quantity).contains(&quantity) {
                return Err(CoreError::Validation(format!(
                    "Quantity must be between 1 and {max_quantity}, got {quantity}"
                )));
            }
            let food = match self.menu.get_food(food_id).await {
                Ok(food) if food.available && food.restaurant == restaurant.name => food,
                Ok(_) | Err(RepositoryError::NotFound(_)) => {
                    return Err(CoreError::Validation(format!(
                        "Food {food_id} is not on the menu of {}",
                        restaurant.name
                    )));
                }
                Err(e) => return Err(e.into()),
            };
            line_totals.push(food.price.checked_mul(quantity)?);
        }

        let shipping_rate = settings.effective_shipping_rate();
        let quote = Money::checked_sum(line_totals)?.checked_add(shipping_rate)?;
        let available = actor.balance();
        if available < quote {
            return Err(CoreError::InsufficientCredit {
                needed: quote,
                available,
            });
        }

        let placed = PlacedOrder {
            restaurant: restaurant.name,
            client: actor.username.clone(),
            created_at: Utc::now(),
            shipping_rate,
            lines: request.lines,
        };
        let order = self.orders.place(&placed).await.map_err(|e| match e {
            RepositoryError::Constraint(_) => CoreError::InsufficientCredit {
                needed: quote,
                available,
            },
            other => other.into(),
        })?;

        let total = order.total()?;
        info!(order = order.id, client = %order.client, restaurant = %order.restaurant, %total, "Placed order");
        Ok(order)
    }

    /// The restaurant marks a waiting order as ready for pickup.
    pub async fn mark_ready(&self, actor: &User, id: i64) -> Result<Order, CoreError> {
        let order = self.orders.get(id).await?;
        if !self.owns_restaurant(actor, &order).await? {
            return Err(CoreError::denied("only the restaurant can mark its orders ready"));
        }
        self.transition(&order, OrderTransition::MarkReady, Vec::new())
            .await
    }

    /// A deliveryman takes a ready order.
    pub async fn accept(&self, actor: &User, id: i64) -> Result<Order, CoreError> {
        if !actor.is(Role::Deliveryman) {
            return Err(CoreError::denied("only deliverymen can accept orders"));
        }
        let order = self.orders.get(id).await?;
        let transition = OrderTransition::Accept {
            deliveryman: actor.username.clone(),
        };
        self.transition(&order, transition, Vec::new()).await
    }

    /// The assigned deliveryman hands the order over; restaurant and
    /// deliveryman get paid.
    pub async fn deliver(&self, actor: &User, id: i64) -> Result<Order, CoreError> {
        let order = self.orders.get(id).await?;
        if order.deliveryman.as_deref() != Some(actor.username.as_str()) {
            return Err(CoreError::denied("only the assigned deliveryman can deliver an order"));
        }
        let owner = self.restaurants.get(&order.restaurant).await?.owner;
        let movements = vec![
            CreditMovement::new(owner, order.subtotal()?),
            CreditMovement::new(actor.username.clone(), order.shipping_rate),
        ];
        self.transition(&order, OrderTransition::Deliver, movements)
            .await
    }

    /// Cancel an order and refund the client.
    ///
    /// Clients may cancel while the order is waiting, the restaurant while it
    /// has not been picked up, admins at any point before delivery.
    pub async fn cancel(&self, actor: &User, id: i64) -> Result<Order, CoreError> {
        let order = self.orders.get(id).await?;
        let involved = match actor.role {
            Role::Admin => true,
            Role::Client => actor.username == order.client,
            Role::Restaurant => self.owns_restaurant(actor, &order).await?,
            Role::Deliveryman => false,
        };
        if !involved {
            return Err(CoreError::denied(format!(
                "{} cannot cancel order {id}",
                actor.username
            )));
        }

        // Terminal states fall through to the transition check
        let in_window = match actor.role {
            Role::Client => order.state == OrderState::Waiting,
            Role::Restaurant => matches!(order.state, OrderState::Waiting | OrderState::Ready),
            _ => true,
        };
        if !in_window && !order.state.is_terminal() {
            return Err(CoreError::denied(format!(
                "{} cannot cancel order {id} while it is {}",
                actor.username, order.state
            )));
        }
        let refund = vec![CreditMovement::new(order.client.clone(), order.total()?)];
        self.transition(&order, OrderTransition::Cancel, refund)
            .await
    }

    /// Orders visible to the actor, optionally only in one state.
    pub async fn list_for(
        &self,
        actor: &User,
        state: Option<OrderState>,
    ) -> Result<Vec<Order>, CoreError> {
        let scope = match actor.role {
            Role::Admin => OrderScope::All,
            Role::Client => OrderScope::Client(actor.username.clone()),
            Role::Deliveryman => OrderScope::Deliveryman(actor.username.clone()),
            Role::Restaurant => {
                match self.restaurants.get_by_owner(&actor.username).await {
                    Ok(r) => OrderScope::Restaurant(r.name),
                    Err(RepositoryError::NotFound(_)) => return Ok(Vec::new()),
                    Err(e) => return Err(e.into()),
                }
            }
        };
        Ok(self
            .orders
            .list(&OrderFilter::new(scope).with_state(state))
            .await?)
    }

    /// One order, if the actor is a party to it.
    pub async fn get(&self, actor: &User, id: i64) -> Result<Order, CoreError> {
        let order = self.orders.get(id).await?;
        let visible = match actor.role {
            Role::Admin => true,
            Role::Client => order.client == actor.username,
            Role::Deliveryman => {
                order.state == OrderState::Ready
                    || order.deliveryman.as_deref() == Some(actor.username.as_str())
            }
            Role::Restaurant => self.owns_restaurant(actor, &order).await?,
        };
        if visible {
            Ok(order)
        } else {
            Err(CoreError::denied(format!("order {id} is not yours")))
        }
    }

    async fn owns_restaurant(&self, actor: &User, order: &Order) -> Result<bool, CoreError> {
        if !actor.is(Role::Restaurant) {
            return Ok(false);
        }
        let restaurant = self.restaurants.get(&order.restaurant).await?;
        Ok(restaurant.owner == actor.username)
    }

    async fn transition(
        &self,
        order: &Order,
        transition: OrderTransition,
        movements: Vec<CreditMovement>,
    ) -> Result<Order, CoreError> {
        let target = transition.target_state();
        if !order.state.can_transition_to(target) {
            return Err(CoreError::InvalidTransition(format!(
                "order {} is {} and cannot become {target}",
                order.id, order.state
            )));
        }
        let change = StateChange {
            from: order.state,
            transition,
            at: Utc::now(),
            movements,
        };
        let updated = self
            .orders
            .apply_transition(order.id, &change)
            .await
            .map_err(|e| match e {
                RepositoryError::Constraint(reason) => CoreError::InvalidTransition(reason),
                other => other.into(),
            })?;
        info!(order = updated.id, from = %change.from, to = %updated.state, "Order state changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Food;
    use crate::services::test_support::MemoryStore;
    use tokio_test::{assert_err, assert_ok};

    struct Fixture {
        store: Arc<MemoryStore>,
        service: OrderService,
        owner: User,
        client: User,
        rider: User,
        margherita: Food,
        diavola: Food,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let repos = store.repos();
        let service = OrderService::new(repos.orders, repos.menu, repos.restaurants, repos.settings);
        let (owner, _) = store.seed_restaurant("Da Lorenzo", "lorenzo");
        let client = store.seed_user("mario", Role::Client, Some(Money::from_euros(20)));
        let rider = store.seed_user("luigi", Role::Deliveryman, Some(Money::ZERO));
        let margherita = store.seed_food("Da Lorenzo", "Margherita", 650);
        let diavola = store.seed_food("Da Lorenzo", "Diavola", 800);
        Fixture {
            store,
            service,
            owner,
            client,
            rider,
            margherita,
            diavola,
        }
    }

    fn request(lines: Vec<(i64, u32)>) -> NewOrder {
        NewOrder {
            restaurant: "Da Lorenzo".into(),
            lines,
        }
    }

    #[tokio::test]
    async fn test_place_debits_client() {
        let f = fixture();
        let order = f
            .service
            .place(&f.client, request(vec![(f.margherita.id, 1), (f.diavola.id, 1)]))
            .await
            .unwrap();

        assert_eq!(order.state, OrderState::Waiting);
        assert_eq!(order.shipping_rate, Money::from_cents(250));
        assert_eq!(order.subtotal().unwrap(), Money::from_cents(1450));
        assert_eq!(order.total().unwrap(), Money::from_cents(1700));
        assert_eq!(f.store.credit_of("mario"), Some(Money::from_cents(300)));
    }

    #[tokio::test]
    async fn test_place_rejects_insufficient_credit() {
        let f = fixture();
        let err = f
            .service
            .place(&f.client, request(vec![(f.diavola.id, 3)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientCredit { needed, available }
                if needed == Money::from_cents(2650) && available == Money::from_euros(20)
        ));
        assert_eq!(f.store.credit_of("mario"), Some(Money::from_euros(20)));
    }

    #[tokio::test]
    async fn test_place_validation() {
        let f = fixture();
        assert_err!(f.service.place(&f.client, request(vec![])).await);
        assert_err!(f.service.place(&f.client, request(vec![(f.margherita.id, 0)])).await);
        assert_err!(f.service.place(&f.client, request(vec![(f.margherita.id, 100)])).await);
        assert_err!(
            f.service
                .place(&f.client, request(vec![(f.margherita.id, 1), (f.margherita.id, 1)]))
                .await
        );
        assert_err!(f.service.place(&f.client, request(vec![(999, 1)])).await);
        assert!(matches!(
            f.service.place(&f.owner, request(vec![(f.margherita.id, 1)])).await,
            Err(CoreError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_place_rejects_food_from_other_restaurant() {
        let f = fixture();
        f.store.seed_restaurant("Da Gino", "gino");
        let foreign = f.store.seed_food("Da Gino", "Carbonara", 900);
        let err = f
            .service
            .place(&f.client, request(vec![(foreign.id, 1)]))
            .await;
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_place_rejects_closed_restaurant() {
        let f = fixture();
        let now = Local::now().time();
        let opens = now.overflowing_add_signed(chrono::Duration::hours(2)).0;
        let closes = now.overflowing_add_signed(chrono::Duration::hours(3)).0;
        f.store
            .repos()
            .restaurants
            .update_hours("Da Lorenzo", opens, closes)
            .await
            .unwrap();

        let err = f
            .service
            .place(&f.client, request(vec![(f.margherita.id, 1)]))
            .await;
        assert!(matches!(err, Err(CoreError::Validation(msg)) if msg.contains("closed")));
    }

    #[tokio::test]
    async fn test_full_lifecycle_pays_everyone() {
        let f = fixture();
        let order = f
            .service
            .place(&f.client, request(vec![(f.margherita.id, 2)]))
            .await
            .unwrap();
        assert_eq!(f.store.credit_of("mario"), Some(Money::from_cents(450)));

        assert_ok!(f.service.mark_ready(&f.owner, order.id).await);
        let accepted = f.service.accept(&f.rider, order.id).await.unwrap();
        assert_eq!(accepted.deliveryman.as_deref(), Some("luigi"));
        assert!(accepted.accepted_at.is_some());

        let delivered = f.service.deliver(&f.rider, order.id).await.unwrap();
        assert_eq!(delivered.state, OrderState::Delivered);
        assert!(delivered.delivered_at.is_some());
        assert_eq!(f.store.credit_of("lorenzo"), Some(Money::from_cents(1300)));
        assert_eq!(f.store.credit_of("luigi"), Some(Money::from_cents(250)));
    }

    #[tokio::test]
    async fn test_transitions_enforce_order_and_roles() {
        let f = fixture();
        let order = f
            .service
            .place(&f.client, request(vec![(f.margherita.id, 1)]))
            .await
            .unwrap();

        assert!(matches!(
            f.service.accept(&f.rider, order.id).await,
            Err(CoreError::InvalidTransition(_))
        ));
        assert!(matches!(
            f.service.mark_ready(&f.client, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
        assert_ok!(f.service.mark_ready(&f.owner, order.id).await);
        assert!(matches!(
            f.service.mark_ready(&f.owner, order.id).await,
            Err(CoreError::InvalidTransition(_))
        ));
        assert!(matches!(
            f.service.accept(&f.client, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));

        assert_ok!(f.service.accept(&f.rider, order.id).await);
        let other_rider = f.store.seed_user("toad", Role::Deliveryman, Some(Money::ZERO));
        assert!(matches!(
            f.service.deliver(&other_rider, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_refunds_client() {
        let f = fixture();
        let order = f
            .service
            .place(&f.client, request(vec![(f.diavola.id, 2)]))
            .await
            .unwrap();
        assert_eq!(f.store.credit_of("mario"), Some(Money::from_cents(150)));

        let cancelled = f.service.cancel(&f.client, order.id).await.unwrap();
        assert_eq!(cancelled.state, OrderState::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(f.store.credit_of("mario"), Some(Money::from_euros(20)));

        assert!(matches!(
            f.service.cancel(&f.client, order.id).await,
            Err(CoreError::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_permissions_follow_state() {
        let f = fixture();
        let admin = f.store.seed_user("boss", Role::Admin, None);
        let order = f
            .service
            .place(&f.client, request(vec![(f.margherita.id, 1)]))
            .await
            .unwrap();
        f.service.mark_ready(&f.owner, order.id).await.unwrap();

        assert!(matches!(
            f.service.cancel(&f.client, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
        f.service.accept(&f.rider, order.id).await.unwrap();
        assert!(matches!(
            f.service.cancel(&f.owner, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
        assert!(matches!(
            f.service.cancel(&f.rider, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
        assert_ok!(f.service.cancel(&admin, order.id).await);
        assert_eq!(f.store.credit_of("mario"), Some(Money::from_euros(20)));
    }

    #[tokio::test]
    async fn test_cancel_by_outsider_is_denied_in_any_state() {
        let f = fixture();
        let stranger = f.store.seed_user("peach", Role::Client, Some(Money::from_euros(50)));
        let order = f
            .service
            .place(&f.client, request(vec![(f.margherita.id, 1)]))
            .await
            .unwrap();

        assert!(matches!(
            f.service.cancel(&stranger, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
        f.service.cancel(&f.client, order.id).await.unwrap();
        assert!(matches!(
            f.service.cancel(&stranger, order.id).await,
            Err(CoreError::PermissionDenied(msg)) if !msg.contains("cancelled")
        ));
        assert!(matches!(
            f.service.cancel(&f.rider, order.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_and_visibility_by_role() {
        let f = fixture();
        let other_client = f.store.seed_user("peach", Role::Client, Some(Money::from_euros(50)));
        let first = f
            .service
            .place(&f.client, request(vec![(f.margherita.id, 1)]))
            .await
            .unwrap();
        let second = f
            .service
            .place(&other_client, request(vec![(f.diavola.id, 1)]))
            .await
            .unwrap();
        f.service.mark_ready(&f.owner, second.id).await.unwrap();

        assert_eq!(f.service.list_for(&f.client, None).await.unwrap().len(), 1);
        assert_eq!(f.service.list_for(&f.owner, None).await.unwrap().len(), 2);
        assert_eq!(
            f.service
                .list_for(&f.owner, Some(OrderState::Waiting))
                .await
                .unwrap()
                .len(),
            1
        );

        let rider_view = f.service.list_for(&f.rider, None).await.unwrap();
        assert_eq!(rider_view.len(), 1);
        assert_eq!(rider_view[0].id, second.id);

        assert_ok!(f.service.get(&f.client, first.id).await);
        assert!(matches!(
            f.service.get(&f.client, second.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
        assert!(matches!(
            f.service.get(&f.rider, first.id).await,
            Err(CoreError::PermissionDenied(_))
        ));
        assert_ok!(f.service.get(&f.rider, second.id).await);
    }
}
