//! Bounded menu-fetch worker pool.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chipotle_client::CatalogApi;
use chipotle_core::{Menu, Restaurant};
use chipotle_store::CatalogWriter;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub const DEFAULT_FETCH_WORKERS: usize = 75;

/// What the fetch phase produced once every worker has exited.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Completion order, not input order.
    pub menus: Vec<Menu>,
    pub persisted_restaurants: usize,
    pub failed_menus: usize,
}

#[derive(Debug, Default)]
struct WorkerTally {
    persisted: usize,
    failed_menus: usize,
}

/// Persists every restaurant and collects the menus that could be fetched.
///
/// `workers` tasks drain a shared queue. Each one writes the restaurant under
/// the writer lock, then fetches the menu with no lock held, then appends it
/// under the menu lock. A failed menu fetch is logged and skipped; a failed
/// restaurant write aborts every worker and is returned.
pub async fn fetch_menus<A, W>(
    api: Arc<A>,
    writer: Arc<Mutex<W>>,
    restaurants: Vec<Restaurant>,
    workers: usize,
) -> Result<FetchOutcome>
where
    A: CatalogApi + ?Sized + 'static,
    W: CatalogWriter + 'static,
{
    let workers = workers.max(1);
    let (tx, rx) = mpsc::channel::<Restaurant>(workers);
    let queue = Arc::new(Mutex::new(rx));
    let menus = Arc::new(Mutex::new(Vec::with_capacity(restaurants.len())));

    let mut set = JoinSet::new();
    for worker_id in 0..workers {
        set.spawn(fetch_worker(
            worker_id,
            Arc::clone(&queue),
            Arc::clone(&api),
            Arc::clone(&writer),
            Arc::clone(&menus),
        ));
    }
    drop(queue);

    let producer = tokio::spawn(async move {
        for restaurant in restaurants {
            // Closed only when every worker is gone.
            if tx.send(restaurant).await.is_err() {
                break;
            }
        }
    });

    let mut outcome = FetchOutcome::default();
    while let Some(joined) = set.join_next().await {
        let tally = match joined {
            Ok(Ok(tally)) => tally,
            Ok(Err(err)) => {
                set.abort_all();
                producer.abort();
                return Err(err);
            }
            Err(join_err) => {
                set.abort_all();
                producer.abort();
                return Err(anyhow!(join_err).context("menu fetch worker panicked"));
            }
        };
        outcome.persisted_restaurants += tally.persisted;
        outcome.failed_menus += tally.failed_menus;
    }
    producer.await.context("joining restaurant producer")?;

    let menus = Arc::try_unwrap(menus)
        .map_err(|_| anyhow!("menu collection still shared after the worker barrier"))?;
    outcome.menus = menus.into_inner();
    Ok(outcome)
}

async fn fetch_worker<A, W>(
    worker_id: usize,
    queue: Arc<Mutex<mpsc::Receiver<Restaurant>>>,
    api: Arc<A>,
    writer: Arc<Mutex<W>>,
    menus: Arc<Mutex<Vec<Menu>>>,
) -> Result<WorkerTally>
where
    A: CatalogApi + ?Sized + 'static,
    W: CatalogWriter + 'static,
{
    let mut tally = WorkerTally::default();
    loop {
        let next = queue.lock().await.recv().await;
        let Some(restaurant) = next else {
            break;
        };

        {
            let writer = writer.lock().await;
            writer
                .insert_restaurant(&restaurant)
                .await
                .with_context(|| format!("persisting restaurant {}", restaurant.display_name()))?;
        }
        tally.persisted += 1;

        match api.get_menu(restaurant.restaurant_number).await {
            Ok(menu) => {
                menus.lock().await.push(menu);
                debug!(worker_id, restaurant = restaurant.restaurant_number, "fetched menu");
            }
            Err(err) => {
                tally.failed_menus += 1;
                warn!(
                    restaurant = %restaurant.display_name(),
                    error = %err,
                    "failed to fetch menu; skipping"
                );
            }
        }
    }
    Ok(tally)
}
