use cucumber::given;

use crate::{
    cucumber::{MarketSystem, MarketWorld},
    support::prepare_env::seed_gig,
};

#[given("a fresh marketplace")]
async fn fresh_marketplace(world: &mut MarketWorld) {
    world.system = Some(MarketSystem::new().await);
}

#[given(expr = "{word} offers {string} for {int} cents")]
async fn offer_gig(world: &mut MarketWorld, owner: String, title: String, price: i64) {
    let system = world.system();
    let owner = system.user(&owner);
    let gig = seed_gig(&system.db, &owner, &title, price).await;
    system.gigs.insert(title, gig.id);
}
