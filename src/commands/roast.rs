use anyhow::Result;
use cliclack::{input, select, spinner};
use console::style;

use crate::providers::vision::VisionClient;
use crate::render::{print_markdown, roast_markdown, Theme};
use crate::videos::{Clock, Video, VideoCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Roast,
    Upload,
    Refresh,
    Quit,
}

pub async fn run<C: Clock>(cache: &mut VideoCache<VisionClient, C>, theme: Theme) -> Result<()> {
    loop {
        let action = select("What would you like to do?")
            .item(Action::Roast, "Roast a video", "")
            .item(Action::Upload, "Upload a video", "by URL")
            .item(Action::Refresh, "Refresh the video list", "")
            .item(Action::Quit, "Quit", "")
            .interact()?;

        match action {
            Action::Roast => roast(cache, theme).await?,
            Action::Upload => upload(cache).await?,
            Action::Refresh => {
                cache.invalidate();
                let videos = cache.fetch().await;
                println!("{} video(s) available", videos.len());
            }
            Action::Quit => break,
        }
        println!();
    }
    Ok(())
}

fn video_label(video: &Video) -> String {
    match video.display_url() {
        "" => video.display_name().to_string(),
        url => format!("{} ({})", video.display_name(), url),
    }
}

async fn roast<C: Clock>(cache: &mut VideoCache<VisionClient, C>, theme: Theme) -> Result<()> {
    let videos = cache.fetch().await;
    if videos.is_empty() {
        println!("{}", style("No videos available. Upload one first.").yellow());
        return Ok(());
    }

    let mut picker = select("Pick a video to roast");
    for (index, video) in videos.iter().enumerate() {
        picker = picker.item(index, video_label(video), "");
    }
    let index = picker.interact()?;
    let video = &videos[index];

    let spin = spinner();
    spin.start("Watching the video");
    let outcome = cache.source().ask_video(&video.video_id).await;
    spin.stop("");

    match outcome {
        Ok(answer) => print_markdown(&roast_markdown(&answer.resolve()), theme)?,
        Err(e) => println!("{} {}", style("Error:").red(), e),
    }
    Ok(())
}

async fn upload<C: Clock>(cache: &mut VideoCache<VisionClient, C>) -> Result<()> {
    let name: String = input("Video name").placeholder("My dance video").interact()?;
    let url: String = input("Video URL").placeholder("https://...").interact()?;

    let spin = spinner();
    spin.start("Uploading");
    let outcome = cache.upload(&name, &url).await;
    spin.stop("");

    match outcome {
        Ok(video_id) => println!(
            "{} {}",
            style("Video uploaded successfully:").green(),
            video_id
        ),
        Err(e) => println!("{} {}", style("Error:").red(), e),
    }
    Ok(())
}
