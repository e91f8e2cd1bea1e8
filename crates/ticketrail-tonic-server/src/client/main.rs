//! Demo client that walks through a typical booking session against a running
//! `ticketrail-tonic-server`.

use anyhow::Context;
use clap::Parser;
use ticketrail_tonic_core::proto::{
    GetReceiptRequest, GetUsersBySectionRequest, ModifyUserSeatRequest, PurchaseTicketRequest,
    RemoveUserRequest, Seat, User, ticket_service_client::TicketServiceClient,
};
use tonic::{codec::CompressionEncoding, transport::Channel};

#[derive(Parser, Debug)]
#[command(name = "ticketrail-client", version, about = "Replays a booking session")]
struct Args {
    /// Server URI.
    #[arg(long, env = "TICKETRAIL_ADDR", default_value_t = String::from("http://127.0.0.1:50051"))]
    addr: String,

    /// Origin station used for every purchase.
    #[arg(long, default_value_t = String::from("London"))]
    from: String,

    /// Destination station used for every purchase.
    #[arg(long, default_value_t = String::from("France"))]
    to: String,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let channel = Channel::from_shared(args.addr.clone())
        .context("invalid server address")?
        .connect()
        .await
        .with_context(|| format!("failed to connect to {}", args.addr))?;
    let mut client = TicketServiceClient::new(channel)
        .send_compressed(CompressionEncoding::Zstd)
        .accept_compressed(CompressionEncoding::Zstd);

    println!("\n=== Purchasing tickets ===");
    let emails = ["test@example.com", "test23@example.com", "test3@example.com"];
    for email in emails {
        let receipt = client
            .purchase_ticket(PurchaseTicketRequest {
                user: Some(User {
                    email: email.to_string(),
                    first_name: "Nandha".to_string(),
                    last_name: "Kumar".to_string(),
                }),
                from: args.from.clone(),
                to: args.to.clone(),
            })
            .await
            .with_context(|| format!("PurchaseTicket failed for {email}"))?
            .into_inner();
        println!("Purchased ticket: {receipt:?}");
    }

    println!("\n=== Fetching receipt ===");
    let receipt = client
        .get_receipt(GetReceiptRequest {
            email: emails[0].to_string(),
        })
        .await
        .context("GetReceipt failed")?
        .into_inner();
    println!("Receipt: {receipt:?}");

    println!("\n=== Passengers in section A ===");
    let users = client
        .get_users_by_section(GetUsersBySectionRequest {
            section: "A".to_string(),
        })
        .await
        .context("GetUsersBySection failed")?
        .into_inner()
        .users;
    for user in &users {
        println!("{user:?}");
    }

    println!("\n=== Moving {} ===", emails[0]);
    // Aim for the last seat of section B, which the round-robin fill reaches last.
    let modified = client
        .modify_user_seat(ModifyUserSeatRequest {
            email: emails[0].to_string(),
            new_seat: Some(Seat {
                section: "B".to_string(),
                seat_number: 50,
            }),
        })
        .await;
    match modified {
        Ok(receipt) => println!("Modified ticket: {:?}", receipt.into_inner()),
        Err(status) => println!("ModifyUserSeat rejected: {status}"),
    }

    println!("\n=== Cancelling {} ===", emails[1]);
    let response = client
        .remove_user(RemoveUserRequest {
            email: emails[1].to_string(),
        })
        .await
        .context("RemoveUser failed")?
        .into_inner();
    println!("{}", response.message);

    Ok(())
}
