use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use feedback_data::FeedbackDataset;
use recommender::{rmse, split, Model, SgdTrainer, TrainingConfig};
use serving::{EventCatalog, RecommenderService};

/// EventRecs - Event Recommendation Engine
#[derive(Parser)]
#[command(name = "event-recs")]
#[command(about = "Event recommendation engine using collaborative filtering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model from a feedback export and save the artifacts
    Train {
        /// Path to the feedback export (JSON array of {userId, eventId, rating})
        #[arg(long, default_value = "data/feedback_data.json")]
        feedback: PathBuf,

        /// Where to write the trained model artifact
        #[arg(long, default_value = "models/model.json")]
        model_out: PathBuf,

        /// Where to write the event catalog artifact
        #[arg(long, default_value = "models/event_catalog.json")]
        catalog_out: PathBuf,

        /// Fraction of records held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Seed for the split and for factor initialization
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Latent factor dimensionality (K)
        #[arg(long, default_value = "100")]
        factors: usize,

        /// Number of training epochs
        #[arg(long, default_value = "20")]
        epochs: usize,

        /// SGD learning rate
        #[arg(long, default_value = "0.005")]
        learning_rate: f64,

        /// L2 regularization strength
        #[arg(long, default_value = "0.02")]
        regularization: f64,
    },

    /// Get event recommendations for a user from saved artifacts
    Recommend {
        /// Path to the trained model artifact
        #[arg(long, default_value = "models/model.json")]
        model: PathBuf,

        /// Path to the event catalog artifact
        #[arg(long, default_value = "models/event_catalog.json")]
        catalog: PathBuf,

        /// User ID to get recommendations for
        #[arg(long)]
        user_id: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        top_n: usize,

        /// Restrict ranking to these event ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        events: Option<Vec<String>>,
    },

    /// Predict the rating one user would give one event
    Predict {
        /// Path to the trained model artifact
        #[arg(long, default_value = "models/model.json")]
        model: PathBuf,

        /// User ID to predict for
        #[arg(long)]
        user_id: String,

        /// Event ID to predict for
        #[arg(long)]
        event_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            feedback,
            model_out,
            catalog_out,
            test_fraction,
            seed,
            factors,
            epochs,
            learning_rate,
            regularization,
        } => handle_train(
            feedback,
            model_out,
            catalog_out,
            test_fraction,
            seed,
            TrainingConfig {
                num_factors: factors,
                num_epochs: epochs,
                learning_rate,
                regularization,
                seed,
            },
        ),
        Commands::Recommend {
            model,
            catalog,
            user_id,
            top_n,
            events,
        } => handle_recommend(model, catalog, user_id, top_n, events).await,
        Commands::Predict {
            model,
            user_id,
            event_id,
        } => handle_predict(model, user_id, event_id),
    }
}

/// Handle the 'train' command
fn handle_train(
    feedback: PathBuf,
    model_out: PathBuf,
    catalog_out: PathBuf,
    test_fraction: f64,
    seed: u64,
    config: TrainingConfig,
) -> Result<()> {
    println!("Loading feedback data from {}...", feedback.display());
    let dataset = FeedbackDataset::from_json_file(&feedback)
        .context("Failed to load feedback data")?;
    let (users, events, records) = dataset.counts();
    println!(
        "{} Loaded {} records ({} users, {} events)",
        "✓".green(),
        records,
        users,
        events
    );

    println!("Splitting data into train and test sets...");
    let (train, test) = split(&dataset, test_fraction, seed)
        .context("Failed to split the dataset")?;
    println!(
        "{} Split into {} train / {} test records",
        "✓".green(),
        train.len(),
        test.len()
    );

    println!(
        "Training model (K={}, {} epochs, lr={}, reg={})...",
        config.num_factors, config.num_epochs, config.learning_rate, config.regularization
    );
    let start = Instant::now();
    let trainer = SgdTrainer::new(config).context("Invalid training configuration")?;
    let model = trainer.fit(&train).context("Training failed")?;
    println!("{} Trained in {:?}", "✓".green(), start.elapsed());

    if test.is_empty() {
        println!(
            "{} Test subset is empty, skipping evaluation",
            "!".yellow()
        );
    } else {
        let test_rmse = rmse(&model, &test).context("Evaluation failed")?;
        println!("{} Test RMSE: {:.4}", "✓".green(), test_rmse);
    }

    println!("Saving artifacts...");
    for path in [&model_out, &catalog_out] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    model
        .save_to_file(&model_out)
        .context("Failed to save the model artifact")?;
    EventCatalog::from_dataset(&dataset)
        .save_to_file(&catalog_out)
        .context("Failed to save the catalog artifact")?;
    println!(
        "{} Saved model to {} and catalog to {}",
        "✓".green(),
        model_out.display(),
        catalog_out.display()
    );

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    model: PathBuf,
    catalog: PathBuf,
    user_id: String,
    top_n: usize,
    events: Option<Vec<String>>,
) -> Result<()> {
    let service = RecommenderService::new();
    service
        .install_from_files(&model, &catalog)
        .context("Failed to load the model artifacts")?;

    let recommendations = service
        .get_recommendations(&user_id, events, top_n)
        .await
        .with_context(|| format!("Failed to get recommendations for user {user_id}"))?;

    println!(
        "{}",
        format!("Top {} events for user {}:", recommendations.len(), user_id)
            .bold()
            .blue()
    );
    for (rank, prediction) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - predicted rating {:.2}",
            (rank + 1).to_string().green(),
            prediction.event_id,
            prediction.predicted_rating
        );
    }

    Ok(())
}

/// Handle the 'predict' command
fn handle_predict(model: PathBuf, user_id: String, event_id: String) -> Result<()> {
    let model = Model::load_from_file(&model).context("Failed to load the model artifact")?;

    let predicted = model.predict(&user_id, &event_id);
    let note = match (model.knows_user(&user_id), model.knows_event(&event_id)) {
        (true, true) => "",
        (false, true) => " (cold-start user)",
        (true, false) => " (cold-start event)",
        (false, false) => " (cold-start user and event)",
    };
    println!(
        "Predicted rating for user {} and event {}: {}{}",
        user_id.bold(),
        event_id.bold(),
        format!("{predicted:.2}").green(),
        note
    );

    Ok(())
}
