//! Shared fixtures for lorma-db integration tests.

use chrono::NaiveTime;
use lorma_core::{AppCore, Food, MacroType, Money, NewRestaurant, NewUser, Role, User, UserProfile};

pub const PASSWORD: &str = "P@ssw0rd";

pub fn profile(name: &str) -> UserProfile {
    UserProfile {
        name: name.into(),
        surname: "Bianchi".into(),
        phone: "0547 000000".into(),
        email: format!("{}@example.it", name.to_lowercase()),
        city: "Forlì".into(),
        street: "Corso Garibaldi".into(),
        house_number: "7".into(),
    }
}

pub fn new_user(username: &str, role: Role) -> NewUser {
    NewUser {
        username: username.into(),
        password: PASSWORD.into(),
        profile: profile(username),
        role,
    }
}

/// Everyone needed to walk an order through its lifecycle.
pub struct Cast {
    pub admin: User,
    pub owner: User,
    pub client: User,
    pub rider: User,
    pub pizza: Food,
    pub beer: Food,
}

/// Register an admin, a restaurant with a two-item menu, a client and a
/// deliveryman through the services.
pub async fn cast(core: &AppCore) -> Cast {
    let admin = core.auth().register(None, new_user("boss", Role::Admin)).await.unwrap();
    let (owner, restaurant) = core
        .restaurants()
        .register_owner(
            new_user("lorenzo", Role::Restaurant),
            NewRestaurant {
                name: "Da Lorenzo".into(),
                vat_id: "12345678901".into(),
                opening_time: NaiveTime::MIN,
                closing_time: NaiveTime::MIN,
            },
        )
        .await
        .unwrap();
    assert_eq!(restaurant.owner, owner.username);

    core.menu().add_food_type(&admin, "pizza", MacroType::Dish).await.unwrap();
    core.menu().add_food_type(&owner, "birra", MacroType::Drink).await.unwrap();
    let pizza = core
        .menu()
        .add_food(&owner, "Margherita", Money::from_cents(650), "pizza")
        .await
        .unwrap();
    let beer = core
        .menu()
        .add_food(&owner, "Moretti", Money::from_cents(350), "birra")
        .await
        .unwrap();

    let client = core.auth().register(None, new_user("mario", Role::Client)).await.unwrap();
    let rider = core.auth().register(None, new_user("luigi", Role::Deliveryman)).await.unwrap();

    Cast {
        admin,
        owner,
        client,
        rider,
        pizza,
        beer,
    }
}

/// Current balance, read back through the login path.
pub async fn balance(core: &AppCore, username: &str) -> Money {
    core.auth().login(username, PASSWORD).await.unwrap().balance()
}
