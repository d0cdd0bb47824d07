//! Seed command: a demo store with customers, campaigns and sales so the
//! campaign engine can be exercised immediately after setup.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use tracing::info;

use storeline_core::{CampaignStatus, Channel, TriggerKind};
use storeline_server::db;
use storeline_server::models::{
    CreateCampaignInput, CreateCustomerInput, CreateSaleInput, CreateSaleItemInput,
    CreateStoreInput,
};

use super::{CliError, database_url};

const FIRST_NAMES: &[&str] = &[
    "Asha", "Ravi", "Meera", "Arjun", "Divya", "Kiran", "Priya", "Rahul", "Sneha", "Vikram",
    "Anita", "Suresh", "Kavya", "Nikhil", "Pooja",
];

const PRODUCTS: &[(&str, i64, Option<u32>)] = &[
    ("Ceiling Fan", 2499, Some(24)),
    ("Mixer Grinder", 3999, Some(12)),
    ("LED Bulb 9W", 199, None),
    ("Water Heater", 8999, Some(36)),
    ("Extension Board", 449, Some(6)),
];

/// Seed the database with demo data.
///
/// # Errors
///
/// Returns an error if the database URL is missing or any insert fails.
pub async fn run(customer_count: u32) -> Result<(), CliError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let store = db::stores::create_store(
        &pool,
        CreateStoreInput {
            name: "Storeline Demo Store".to_string(),
            address: Some("12 MG Road, Bengaluru".to_string()),
            phone: Some("+918040001234".to_string()),
            email: Some("demo@storeline.app".to_string()),
        },
    )
    .await?;
    info!(store_id = %store.id, "Created demo store");

    let mut rng = rand::rng();
    let mut customers = Vec::new();
    for i in 0..customer_count {
        let name = FIRST_NAMES
            .get(i as usize % FIRST_NAMES.len())
            .copied()
            .unwrap_or("Customer");
        let year = rng.random_range(1965..2005);
        let month = rng.random_range(1..=12);
        let day = rng.random_range(1..=28);

        let customer = db::customers::create_customer(
            &pool,
            CreateCustomerInput {
                store_id: store.id,
                name: format!("{name} {}", i + 1),
                // Every third customer is phone-only, every fifth email-only,
                // so dispatch runs show mixed outcomes.
                phone: (i % 5 != 0).then(|| format!("98{:08}", 10_000_000 + i)),
                email: (i % 3 != 0).then(|| format!("{}{}@example.com", name.to_lowercase(), i)),
                address: None,
                date_of_birth: NaiveDate::from_ymd_opt(year, month, day),
            },
        )
        .await?;
        customers.push(customer);
    }
    info!(count = customers.len(), "Created demo customers");

    // Sales for the first half of the customers; the rest stay purchase-less
    // so the no-purchase trigger has recipients.
    for customer in customers.iter().take(customers.len() / 2) {
        let (product, price, warranty) = PRODUCTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(("LED Bulb 9W", 199, None));
        let days_ago = rng.random_range(1..90);
        db::sales::record_sale(
            &pool,
            CreateSaleInput {
                store_id: store.id,
                customer_id: Some(customer.id),
                sale_date: Some(Utc::now() - Duration::days(days_ago)),
                items: vec![CreateSaleItemInput {
                    product_name: product.to_string(),
                    quantity: 1,
                    unit_price: Decimal::from(price),
                    warranty_months: warranty,
                }],
            },
        )
        .await?;
    }
    info!("Recorded demo sales");

    let campaigns = [
        CreateCampaignInput {
            store_id: store.id,
            name: "Welcome Offer".to_string(),
            description: Some("Manually dispatched welcome message".to_string()),
            channel: Channel::Sms,
            trigger_kind: TriggerKind::Manual,
            message_template: "Hi {name}, welcome to Storeline! Use {discount_code} for {discount} off."
                .to_string(),
            subject: None,
            start_date: None,
            end_date: None,
            days_before_trigger: None,
            discount_code: Some("WELCOME10".to_string()),
            discount_percentage: Some(10.0),
            skip_if_already_sent: false,
        },
        CreateCampaignInput {
            store_id: store.id,
            name: "Festival Sale".to_string(),
            description: Some("Runs while the festival window is open".to_string()),
            channel: Channel::Email,
            trigger_kind: TriggerKind::Festival,
            message_template:
                "Dear {customer_name}, our {campaign_name} runs until {end_date}. Enjoy {discount} off!"
                    .to_string(),
            subject: Some("{campaign_name} - {discount} off".to_string()),
            start_date: Some(Utc::now() - Duration::days(1)),
            end_date: Some(Utc::now() + Duration::days(7)),
            days_before_trigger: None,
            discount_code: Some("FESTIVE20".to_string()),
            discount_percentage: Some(20.0),
            skip_if_already_sent: true,
        },
        CreateCampaignInput {
            store_id: store.id,
            name: "We Miss You".to_string(),
            description: Some("Customers with no purchase in 30 days".to_string()),
            channel: Channel::Whatsapp,
            trigger_kind: TriggerKind::NoPurchase30Days,
            message_template: "Hi {name}, it has been a while! Your {loyalty_points} points are waiting."
                .to_string(),
            subject: None,
            start_date: None,
            end_date: None,
            days_before_trigger: None,
            discount_code: None,
            discount_percentage: None,
            skip_if_already_sent: false,
        },
        CreateCampaignInput {
            store_id: store.id,
            name: "Birthday Wishes".to_string(),
            description: Some("Greets customers on their birthday".to_string()),
            channel: Channel::Notification,
            trigger_kind: TriggerKind::Birthday,
            message_template: "Happy birthday, {name}! Here is {discount} off just for you."
                .to_string(),
            subject: None,
            start_date: None,
            end_date: None,
            days_before_trigger: Some(0),
            discount_code: Some("BDAY15".to_string()),
            discount_percentage: Some(15.0),
            skip_if_already_sent: true,
        },
    ];

    for input in campaigns {
        let automated = input.trigger_kind != TriggerKind::Manual;
        let campaign = db::campaigns::create_campaign(&pool, input).await?;

        // Walk automated campaigns through the state machine so the sweep
        // picks them up; the manual one stays in Draft for demonstration.
        if automated {
            db::campaigns::set_status(&pool, campaign.id, CampaignStatus::Scheduled).await?;
            db::campaigns::set_status(&pool, campaign.id, CampaignStatus::Active).await?;
        }
        info!(campaign_id = %campaign.id, name = %campaign.name, "Created demo campaign");
    }

    info!("Seed complete");
    Ok(())
}
