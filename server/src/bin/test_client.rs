//! Manual smoke-test client: joins the room, walks around, attacks, leaves,
//! printing every sync packet the server pushes.
//!
//! Run the server, then: `cargo run --bin test_client`

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stream = TcpStream::connect("127.0.0.1:9000").await?;
    println!("connected from {}", stream.local_addr()?);

    let (reader, mut writer) = stream.into_split();

    // Print everything the server pushes
    let printer = tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("<- {}", line);
        }
    });

    let intents = [
        r#"{"type":"join","email":"smoke@example.com","playerName":"Smoke","characterId":"c-7","characterName":"Tester","characterClass":"Rogue"}"#,
        r#"{"type":"move","x":5,"y":-3,"anim":"WalkLeft"}"#,
        r#"{"type":"move","x":8,"y":-3,"anim":"WalkRight"}"#,
        r#"{"type":"attack","direction":"Right"}"#,
        r#"{"type":"leave"}"#,
    ];

    for intent in intents {
        println!("-> {}", intent);
        writer.write_all(intent.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        sleep(Duration::from_millis(250)).await;
    }

    // Give the final packets time to arrive before dropping the connection.
    sleep(Duration::from_millis(250)).await;
    printer.abort();

    Ok(())
}
