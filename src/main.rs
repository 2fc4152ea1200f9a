use recette_gen::publish_once;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let report = publish_once().await?;

    println!("article: {}", report.article_path.display());
    if let Some(image) = &report.image_path {
        println!("image:   {}", image.display());
    }
    println!("index:   {}", report.index_path.display());

    Ok(())
}
